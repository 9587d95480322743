//! Feed generation over the post store.
//!
//! | Output        | Module     |
//! |---------------|------------|
//! | `feed.xml`    | `rss`      |
//! | `sitemap.xml` | `sitemap`  |

pub mod rss;
pub mod sitemap;

pub use self::rss::rss_feed;
pub use sitemap::sitemap;
