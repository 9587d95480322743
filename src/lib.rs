//! Pressroom - blog content engine for a SaaS marketing site.
//!
//! Loads post summaries once, answers listing / featured / related queries
//! over them, loads full articles by slug, and renders JSON-LD, RSS and
//! sitemap output. See [`blog`] for the engine itself.

pub mod blog;
pub mod check;
pub mod cli;
pub mod config;
pub mod generator;
pub mod serve;
pub mod utils;
