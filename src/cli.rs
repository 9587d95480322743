//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::blog::ListingQuery;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pressroom blog content engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root that config and data paths are relative to
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: pressroom.toml)
    #[arg(short = 'C', long, default_value = "pressroom.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Listing filters shared by `list` and `metadata`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Keep posts tagged with any of these verticals (repeatable)
    #[arg(short, long)]
    pub vertical: Vec<String>,

    /// Keep posts in this funnel stage
    #[arg(short, long)]
    pub funnel: Option<String>,

    /// Minimum reading time in minutes (inclusive)
    #[arg(long)]
    pub min_reading_time: Option<u32>,

    /// Maximum reading time in minutes (inclusive)
    #[arg(long)]
    pub max_reading_time: Option<u32>,

    /// Page number, starting at 1
    #[arg(short, long)]
    pub page: Option<usize>,

    /// Page size (default: [content.page_size])
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl ListingArgs {
    /// Build listing criteria, using `page_size` when no limit is given.
    pub fn to_query(&self, page_size: usize) -> ListingQuery {
        let defaults = ListingQuery::default();
        ListingQuery {
            vertical: self.vertical.clone(),
            funnel: self.funnel.clone(),
            min_reading_time: self.min_reading_time.unwrap_or(defaults.min_reading_time),
            max_reading_time: self.max_reading_time.unwrap_or(defaults.max_reading_time),
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(page_size),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List posts matching filters, one page at a time
    List {
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Show the newest post, optionally within verticals
    Featured {
        /// Restrict to these verticals (repeatable)
        #[arg(short, long)]
        vertical: Vec<String>,
    },

    /// Show posts related to a post
    Related {
        /// Slug of the post
        slug: String,

        /// Number of related posts (default: [content.related_count])
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show the full content of a post
    Post {
        /// Slug of the post
        slug: String,

        /// Print schema.org BlogPosting JSON-LD instead of the article
        #[arg(long)]
        json_ld: bool,
    },

    /// List distinct verticals with their labels
    Categories,

    /// List distinct funnel stages with their labels
    Funnels,

    /// Print schema.org ItemList JSON-LD for a listing page
    Metadata {
        #[command(flatten)]
        listing: ListingArgs,

        /// Number of entries (default: [content.metadata_limit])
        #[arg(short = 'n', long)]
        entries: Option<usize>,
    },

    /// Print the RSS feed
    Feed,

    /// Print the sitemap
    Sitemap,

    /// Check that every post has a content file and every content file a post
    Check,

    /// Serve the query API over HTTP
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}
