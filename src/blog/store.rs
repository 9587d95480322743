//! Immutable post store.
//!
//! Holds every post summary in memory, in the order of the data file. The
//! store is built once at startup (`PostStore::load`) and shared read-only by
//! every query; nothing mutates it afterwards.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::types::Post;

/// Errors raised while building the store. All of them are fatal to startup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed post data in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("duplicate slug `{0}`")]
    DuplicateSlug(String),

    #[error("post `{0}` has no vertical")]
    EmptyVertical(String),

    #[error("post `{0}` has a reading time of zero")]
    ZeroReadingTime(String),
}

/// Read-only collection of post summaries with a slug index.
#[derive(Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    by_slug: FxHashMap<String, usize>,
}

impl PostStore {
    /// Load the store from a JSON array of posts.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content =
            fs::read_to_string(path).map_err(|err| StoreError::Io(path.to_path_buf(), err))?;
        let posts: Vec<Post> = serde_json::from_str(&content)
            .map_err(|err| StoreError::Json(path.to_path_buf(), err))?;
        Self::from_posts(posts)
    }

    /// Build the store from already parsed posts, checking slug uniqueness,
    /// non-empty verticals and positive reading times.
    pub fn from_posts(posts: Vec<Post>) -> Result<Self, StoreError> {
        let mut by_slug = FxHashMap::default();
        by_slug.reserve(posts.len());

        for (index, post) in posts.iter().enumerate() {
            if post.vertical.is_empty() {
                return Err(StoreError::EmptyVertical(post.slug.clone()));
            }
            if post.reading_time == 0 {
                return Err(StoreError::ZeroReadingTime(post.slug.clone()));
            }
            if by_slug.insert(post.slug.clone(), index).is_some() {
                return Err(StoreError::DuplicateSlug(post.slug.clone()));
            }
        }

        Ok(Self { posts, by_slug })
    }

    /// All posts, in data file order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Look up a post by slug.
    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.by_slug.get(slug).map(|&index| &self.posts[index])
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::test_support::post;
    use std::io::Write;

    #[test]
    fn test_from_posts_keeps_order() {
        let store = PostStore::from_posts(vec![
            post("a", "2024-01-10", &["fashion"], "awareness", 5),
            post("b", "2024-02-01", &["beauty"], "decision", 12),
        ])
        .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.posts()[0].slug, "a");
        assert_eq!(store.get("b").unwrap().reading_time, 12);
        assert!(store.get("c").is_none());
        assert!(store.contains("a"));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let result = PostStore::from_posts(vec![
            post("a", "2024-01-10", &["fashion"], "awareness", 5),
            post("a", "2024-02-01", &["beauty"], "decision", 12),
        ]);
        assert!(matches!(result, Err(StoreError::DuplicateSlug(slug)) if slug == "a"));
    }

    #[test]
    fn test_empty_vertical_rejected() {
        let result = PostStore::from_posts(vec![post("a", "2024-01-10", &[], "awareness", 5)]);
        assert!(matches!(result, Err(StoreError::EmptyVertical(_))));
    }

    #[test]
    fn test_zero_reading_time_rejected() {
        let result = PostStore::from_posts(vec![post("a", "2024-01-10", &["home"], "awareness", 0)]);
        assert!(matches!(result, Err(StoreError::ZeroReadingTime(_))));
    }

    #[test]
    fn test_empty_store() {
        let store = PostStore::from_posts(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"slug":"a","title":"A","excerpt":"","publishDate":"2024-01-10",
                "vertical":["fashion"],"funnel":"awareness","persona":[],
                "hero":"/a.jpg","readingTime":5}}]"#
        )
        .unwrap();

        let store = PostStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.posts()[0].hero, "/a.jpg");
    }

    #[test]
    fn test_load_missing_file() {
        let result = PostStore::load(Path::new("/nonexistent/posts.json"));
        assert!(matches!(result, Err(StoreError::Io(..))));
    }

    #[test]
    fn test_load_malformed_date() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"slug":"a","title":"A","excerpt":"","publishDate":"January 10",
                "vertical":["fashion"],"funnel":"awareness","hero":"","readingTime":5}}]"#
        )
        .unwrap();

        let result = PostStore::load(file.path());
        assert!(matches!(result, Err(StoreError::Json(..))));
    }
}
