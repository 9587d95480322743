//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "Blog".into()
    }

    pub fn url() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    use crate::blog::query::{DEFAULT_METADATA_LIMIT, DEFAULT_PAGE_SIZE, DEFAULT_RELATED_COUNT};
    use std::path::PathBuf;

    pub fn posts() -> PathBuf {
        "data/posts.json".into()
    }

    pub fn dir() -> PathBuf {
        "data/posts".into()
    }

    pub fn blog_path() -> String {
        "/blog".into()
    }

    pub fn page_size() -> usize {
        DEFAULT_PAGE_SIZE
    }

    pub fn related_count() -> usize {
        DEFAULT_RELATED_COUNT
    }

    pub fn metadata_limit() -> usize {
        DEFAULT_METADATA_LIMIT
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
