//! RSS feed generation.
//!
//! One channel for the whole blog, items newest first, each item tagged with
//! the display labels of its verticals.

use crate::{
    blog::{ContentRepository, Post, QueryEngine},
    config::SiteConfig,
};
use anyhow::{Result, anyhow};
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, Item, ItemBuilder, validation::Validate};

/// Generator tag written into the channel.
const GENERATOR: &str = concat!("pressroom ", env!("CARGO_PKG_VERSION"));

/// Render the blog as an RSS 2.0 channel.
///
/// Requires `[site.url]`, since feed readers need absolute links.
pub fn rss_feed<R: ContentRepository>(engine: &QueryEngine<R>, config: &SiteConfig) -> Result<String> {
    config.require_url()?;

    let items: Vec<Item> = engine
        .newest_first()
        .into_iter()
        .map(|post| build_item(engine, post))
        .collect();

    let channel = ChannelBuilder::default()
        .title(config.site.title.clone())
        .link(engine.permalinks().blog())
        .description(config.site.description.clone())
        .language(Some(config.site.language.clone()))
        .generator(Some(GENERATOR.to_owned()))
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validate: {e}"))?;

    Ok(channel.to_string())
}

fn build_item<R: ContentRepository>(engine: &QueryEngine<R>, post: &Post) -> Item {
    let link = engine.permalinks().post(&post.slug);
    let categories = post
        .vertical
        .iter()
        .map(|tag| {
            CategoryBuilder::default()
                .name(engine.labels().vertical.lookup(tag))
                .build()
        })
        .collect::<Vec<_>>();

    ItemBuilder::default()
        .title(Some(post.title.clone()))
        .link(Some(link.clone()))
        .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
        .description(Some(post.excerpt.clone()))
        .pub_date(Some(to_rfc2822(post)))
        .categories(categories)
        .build()
}

/// Publish date at midnight UTC in RFC 2822 form.
fn to_rfc2822(post: &Post) -> String {
    post.publish_date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().to_rfc2822())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::test_support::{post, sample_engine};
    use crate::blog::Permalinks;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.title = "Acme Insights".into();
        config.site.description = "Retail growth".into();
        config.site.url = Some("https://acme.example".into());
        config
    }

    #[test]
    fn test_rfc2822_date() {
        let p = post("a", "2024-01-10", &["fashion"], "awareness", 5);
        assert_eq!(to_rfc2822(&p), "Wed, 10 Jan 2024 00:00:00 +0000");
    }

    #[test]
    fn test_rss_feed_contents() {
        let config = config();
        let engine = sample_engine().with_permalinks(config.permalinks());
        let xml = rss_feed(&engine, &config).unwrap();

        assert!(xml.contains("<title>Acme Insights</title>"));
        assert!(xml.contains("<link>https://acme.example/blog/</link>"));
        assert!(xml.contains("https://acme.example/blog/b"));
        assert!(xml.contains("<category>Beauty &amp; Cosmetics</category>"));
        assert_eq!(xml.matches("<item>").count(), 3);
    }

    #[test]
    fn test_rss_feed_newest_first() {
        let config = config();
        let engine = sample_engine().with_permalinks(config.permalinks());
        let xml = rss_feed(&engine, &config).unwrap();

        let b = xml.find("<title>Post b</title>").unwrap();
        let c = xml.find("<title>Post c</title>").unwrap();
        let a = xml.find("<title>Post a</title>").unwrap();
        assert!(b < c && c < a);
    }

    #[test]
    fn test_rss_feed_requires_url() {
        let engine = sample_engine().with_permalinks(Permalinks::default());
        let err = rss_feed(&engine, &SiteConfig::default()).unwrap_err();
        assert!(err.to_string().contains("[site.url]"));
    }
}
