//! Blog content engine.
//!
//! ```text
//! posts.json ──► PostStore ──┐
//!                            ├──► QueryEngine ──► pages, feeds, API
//! Labels ────────────────────┤
//! <slug>.json ─► ContentRepository ┘
//! ```
//!
//! The store and labels are built once at startup and never change. Full
//! articles are read from the content repository on every request.

pub mod labels;
pub mod metadata;
pub mod params;
pub mod query;
pub mod repository;
pub mod store;
pub mod types;

pub use labels::{LabelMap, Labels};
pub use metadata::{BlogPosting, ItemList, Permalinks};
pub use query::{Category, ListingQuery, QueryEngine, QueryPage};
pub use repository::{ContentError, ContentRepository, FsContentRepository, MemoryContentRepository};
pub use store::{PostStore, StoreError};
pub use types::{ArticleBody, CallToAction, Post, PostContent, Section};

use crate::{config::SiteConfig, log};

/// Engine backed by the filesystem, as configured in `pressroom.toml`.
pub type SiteEngine = QueryEngine<FsContentRepository>;

/// Load the post store and wire up the engine from configuration.
///
/// Fails when the post data cannot be loaded; nothing can be served without it.
pub fn open(config: &SiteConfig) -> anyhow::Result<SiteEngine> {
    let store = PostStore::load(&config.content.posts)?;
    log!("store"; "loaded {} posts from {}", store.len(), config.content.posts.display());

    Ok(QueryEngine::new(store, FsContentRepository::new(&config.content.dir))
        .with_labels(Labels::from_config(&config.labels))
        .with_permalinks(config.permalinks()))
}
