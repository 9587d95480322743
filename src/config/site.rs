//! `[site]` section configuration.
//!
//! Public facts about the marketing site, used for absolute URLs and feeds.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in pressroom.toml.
///
/// # Example
/// ```toml
/// [site]
/// title = "Acme Commerce"
/// description = "Insights for modern retail teams"
/// url = "https://acme.example"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteInfo {
    /// Site title, used as the RSS channel title.
    #[serde(default = "defaults::site::title")]
    #[educe(Default = defaults::site::title())]
    pub title: String,

    /// Short description for the RSS channel.
    #[serde(default)]
    pub description: String,

    /// Absolute base URL without trailing slash (e.g. `https://acme.example`).
    /// Required for feeds; structured metadata falls back to relative URLs.
    #[serde(default = "defaults::site::url")]
    pub url: Option<String>,

    /// Language code for the RSS channel.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,
}

impl SiteInfo {
    /// Base URL with any trailing slash removed, or `""` when unset.
    pub fn base_url(&self) -> &str {
        self.url.as_deref().map_or("", |url| url.trim_end_matches('/'))
    }
}
