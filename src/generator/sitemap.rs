//! Sitemap generation.
//!
//! Lists the blog index and every post page for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://acme.example/blog/</loc>
//!     <lastmod>2024-02-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    blog::{ContentRepository, QueryEngine},
    config::SiteConfig,
};
use anyhow::Result;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render the blog sitemap. Requires `[site.url]`.
pub fn sitemap<R: ContentRepository>(engine: &QueryEngine<R>, config: &SiteConfig) -> Result<String> {
    config.require_url()?;
    Ok(Sitemap::from_engine(engine).into_xml())
}

/// Sitemap data structure
struct Sitemap {
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    loc: String,
    /// YYYY-MM-DD
    lastmod: Option<String>,
}

impl Sitemap {
    fn from_engine<R: ContentRepository>(engine: &QueryEngine<R>) -> Self {
        let links = engine.permalinks();
        let posts = engine.newest_first();

        let index = UrlEntry {
            loc: links.blog(),
            lastmod: posts.first().map(|post| post.publish_date.to_string()),
        };

        let urls = std::iter::once(index)
            .chain(posts.iter().map(|post| UrlEntry {
                loc: links.post(&post.slug),
                lastmod: Some(post.publish_date.to_string()),
            }))
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
