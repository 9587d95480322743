//! `[content]` section configuration.
//!
//! Where the post data lives and how listings are paged.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[content]` section in pressroom.toml.
///
/// # Example
/// ```toml
/// [content]
/// posts = "data/posts.json"   # summary records
/// dir = "data/posts"          # one <slug>.json per post
/// blog_path = "/blog"
/// page_size = 9
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// JSON array of post summaries, loaded once at startup.
    #[serde(default = "defaults::content::posts")]
    #[educe(Default = defaults::content::posts())]
    pub posts: PathBuf,

    /// Directory of full post records, one `<slug>.json` per post.
    #[serde(default = "defaults::content::dir")]
    #[educe(Default = defaults::content::dir())]
    pub dir: PathBuf,

    /// URL path of the blog index; post URLs are `<blog_path>/<slug>`.
    #[serde(default = "defaults::content::blog_path")]
    #[educe(Default = defaults::content::blog_path())]
    pub blog_path: String,

    /// Posts per listing page.
    #[serde(default = "defaults::content::page_size")]
    #[educe(Default = defaults::content::page_size())]
    pub page_size: usize,

    /// Number of related posts shown under an article.
    #[serde(default = "defaults::content::related_count")]
    #[educe(Default = defaults::content::related_count())]
    pub related_count: usize,

    /// Number of entries in a listing's structured metadata.
    #[serde(default = "defaults::content::metadata_limit")]
    #[educe(Default = defaults::content::metadata_limit())]
    pub metadata_limit: usize,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_content_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.content.posts, PathBuf::from("data/posts.json"));
        assert_eq!(config.content.dir, PathBuf::from("data/posts"));
        assert_eq!(config.content.blog_path, "/blog");
        assert_eq!(config.content.page_size, 9);
        assert_eq!(config.content.related_count, 3);
        assert_eq!(config.content.metadata_limit, 10);
    }

    #[test]
    fn test_content_config_partial_override() {
        let config = r#"
            [content]
            posts = "blog.json"
            page_size = 12
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.content.posts, PathBuf::from("blog.json"));
        assert_eq!(config.content.page_size, 12);
        assert_eq!(config.content.related_count, 3);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [content]
            per_page = 4
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
