//! Per-slug article storage.
//!
//! `ContentRepository` is a key-value lookup from slug to `PostContent`.
//! Two backends are provided:
//!
//! | Backend                   | Source                          |
//! |---------------------------|---------------------------------|
//! | `FsContentRepository`     | `<dir>/<slug>.json`, read async |
//! | `MemoryContentRepository` | records embedded in the process |
//!
//! A missing record is `Ok(None)`; only genuine failures are errors. Records
//! are never cached: every `get` reads its source again.

use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::types::PostContent;

/// Errors raised while loading a single article.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid slug `{0}`")]
    InvalidSlug(String),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed content in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("record for `{expected}` declares slug `{found}`")]
    SlugMismatch { expected: String, found: String },
}

/// Lookup of full articles by slug.
///
/// Calls are independent of each other and may run concurrently.
pub trait ContentRepository: Send + Sync {
    fn get(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<PostContent>, ContentError>> + Send;
}

/// Whether a slug is safe to use as a file stem: ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

// ============================================================================
// Filesystem Backend
// ============================================================================

/// Articles stored as `<dir>/<slug>.json`.
#[derive(Debug, Clone)]
pub struct FsContentRepository {
    dir: PathBuf,
}

impl FsContentRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the article for `slug`.
    pub fn path_for(&self, slug: &str) -> Result<PathBuf, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::InvalidSlug(slug.to_owned()));
        }
        Ok(self.dir.join(format!("{slug}.json")))
    }
}

impl ContentRepository for FsContentRepository {
    async fn get(&self, slug: &str) -> Result<Option<PostContent>, ContentError> {
        let path = self.path_for(slug)?;

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ContentError::Io(path, err)),
        };

        let content = parse_content(&path, &raw)?;
        if content.post.slug != slug {
            return Err(ContentError::SlugMismatch {
                expected: slug.to_owned(),
                found: content.post.slug,
            });
        }

        Ok(Some(content))
    }
}

/// Parse one article file.
pub fn parse_content(path: &Path, raw: &str) -> Result<PostContent, ContentError> {
    serde_json::from_str(raw).map_err(|err| ContentError::Json(path.to_path_buf(), err))
}

// ============================================================================
// In-Memory Backend
// ============================================================================

/// Articles embedded in the process, keyed by their own slug.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentRepository {
    records: FxHashMap<String, PostContent>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `content.post.slug`.
    pub fn insert(&mut self, content: PostContent) {
        self.records.insert(content.post.slug.clone(), content);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PostContent> for MemoryContentRepository {
    fn from_iter<I: IntoIterator<Item = PostContent>>(iter: I) -> Self {
        let mut repository = Self::new();
        for content in iter {
            repository.insert(content);
        }
        repository
    }
}

impl ContentRepository for MemoryContentRepository {
    async fn get(&self, slug: &str) -> Result<Option<PostContent>, ContentError> {
        Ok(self.records.get(slug).cloned())
    }
}
