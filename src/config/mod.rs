//! Configuration management for `pressroom.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `[site]`    | Site metadata (title, description, url)         |
//! | `[content]` | Post data locations, paging and listing sizes   |
//! | `[labels]`  | Extra funnel / vertical display labels          |
//! | `[serve]`   | Query API server (interface, port)              |
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "Acme Commerce"
//! url = "https://acme.example"
//!
//! [content]
//! posts = "data/posts.json"
//! dir = "data/posts"
//!
//! [serve]
//! port = 5277
//! ```

mod content;
pub mod defaults;
mod error;
mod labels;
mod serve;
mod site;

pub use content::ContentConfig;
pub use error::ConfigError;
pub use labels::LabelsConfig;
pub use serve::ServeConfig;
pub use site::SiteInfo;

use crate::blog::Permalinks;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pressroom.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Basic site information
    #[serde(default)]
    pub site: SiteInfo,

    /// Post data settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Extra display labels
    #[serde(default)]
    pub labels: LabelsConfig,

    /// Query API server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: SiteConfig =
            toml::from_str(content).map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;
        Ok(config)
    }

    /// Resolve content paths against `root` and normalize them to absolute paths.
    pub fn resolve_paths(&mut self, root: &Path) {
        let root = Self::normalize_path(root);
        self.content.posts = Self::normalize_path(&root.join(&self.content.posts));
        self.content.dir = Self::normalize_path(&root.join(&self.content.dir));
    }

    /// Override serve settings with CLI values when given
    pub fn update_serve(&mut self, interface: Option<&String>, port: Option<&u16>) {
        Self::update_option(&mut self.serve.interface, interface);
        Self::update_option(&mut self.serve.port, port);
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// URL builder for posts and assets under `[site.url]` and `[content.blog_path]`.
    pub fn permalinks(&self) -> Permalinks {
        Permalinks::new(self.site.base_url(), &self.content.blog_path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.site.url
            && !url.starts_with("http")
        {
            bail!(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into()
            ));
        }

        if !self.content.blog_path.starts_with('/') {
            bail!(ConfigError::Validation(
                "[content.blog_path] must start with `/`".into()
            ));
        }

        if self.content.page_size == 0 {
            bail!(ConfigError::Validation(
                "[content.page_size] must be at least 1".into()
            ));
        }

        Ok(())
    }

    /// Feeds need absolute links, so `[site.url]` becomes mandatory.
    pub fn require_url(&self) -> Result<&str> {
        match &self.site.url {
            Some(_) => Ok(self.site.base_url()),
            None => bail!("[site.url] is required for feed and sitemap generation"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
