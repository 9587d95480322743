//! Machine-readable page metadata (schema.org JSON-LD).
//!
//! - `item_list`: `ItemList` for a blog listing page
//! - `article`: `BlogPosting` for a single post

use serde::Serialize;

use super::{
    labels::Labels,
    types::{Post, PostContent},
};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Builds absolute URLs for posts and site assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permalinks {
    /// Site origin without trailing slash, `""` for relative URLs.
    base: String,
    /// Blog index path with leading and trailing slash.
    blog_path: String,
}

impl Default for Permalinks {
    fn default() -> Self {
        Self::new("", "/blog")
    }
}

impl Permalinks {
    pub fn new(base: &str, blog_path: &str) -> Self {
        let blog_path = blog_path.trim_matches('/');
        let blog_path = if blog_path.is_empty() {
            "/".to_owned()
        } else {
            format!("/{blog_path}/")
        };
        Self {
            base: base.trim_end_matches('/').to_owned(),
            blog_path,
        }
    }

    /// URL of the blog index.
    pub fn blog(&self) -> String {
        format!("{}{}", self.base, self.blog_path)
    }

    /// URL of a post page.
    pub fn post(&self, slug: &str) -> String {
        format!("{}{}{}", self.base, self.blog_path, slug)
    }

    /// Absolute URL for a site-relative asset path; absolute URLs pass through.
    pub fn asset(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }
}

// ============================================================================
// ItemList
// ============================================================================

/// schema.org `ItemList` describing a listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemList {
    #[serde(rename = "@context")]
    pub context: &'static str,

    #[serde(rename = "@type")]
    pub kind: &'static str,

    #[serde(rename = "itemListElement")]
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: &'static str,

    /// 1-based position in the list.
    pub position: usize,

    pub url: String,

    pub name: String,

    pub image: String,
}

/// `ItemList` over the first `limit` posts, in the given order.
pub fn item_list<'a>(
    posts: impl IntoIterator<Item = &'a Post>,
    limit: usize,
    links: &Permalinks,
) -> ItemList {
    let items = posts
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, post)| ListItem {
            kind: "ListItem",
            position: index + 1,
            url: links.post(&post.slug),
            name: post.title.clone(),
            image: links.asset(&post.hero),
        })
        .collect();

    ItemList {
        context: SCHEMA_CONTEXT,
        kind: "ItemList",
        items,
    }
}

// ============================================================================
// BlogPosting
// ============================================================================

/// schema.org `BlogPosting` for one article.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPosting {
    #[serde(rename = "@context")]
    pub context: &'static str,

    #[serde(rename = "@type")]
    pub kind: &'static str,

    pub headline: String,

    pub description: String,

    pub image: String,

    /// `YYYY-MM-DD`
    pub date_published: String,

    pub author: Person,

    pub main_entity_of_page: String,

    pub article_section: Vec<String>,

    /// ISO 8601 duration, e.g. `PT7M`.
    pub time_required: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: &'static str,

    pub name: String,
}

/// `BlogPosting` for a loaded article. Sections use the vertical labels.
pub fn article(content: &PostContent, labels: &Labels, links: &Permalinks) -> BlogPosting {
    let post = &content.post;
    let canonical = if content.canonical.is_empty() {
        links.post(&post.slug)
    } else {
        content.canonical.clone()
    };
    let image = if content.og_image.is_empty() {
        &post.hero
    } else {
        &content.og_image
    };

    BlogPosting {
        context: SCHEMA_CONTEXT,
        kind: "BlogPosting",
        headline: post.title.clone(),
        description: post.excerpt.clone(),
        image: links.asset(image),
        date_published: post.publish_date.format("%Y-%m-%d").to_string(),
        author: Person {
            kind: "Person",
            name: content.author.clone(),
        },
        main_entity_of_page: canonical,
        article_section: post
            .vertical
            .iter()
            .map(|tag| labels.vertical.lookup(tag).to_owned())
            .collect(),
        time_required: format!("PT{}M", post.reading_time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::test_support::{content, sample_posts};

    #[test]
    fn test_permalinks() {
        let links = Permalinks::new("https://acme.example/", "/blog/");
        assert_eq!(links.blog(), "https://acme.example/blog/");
        assert_eq!(links.post("hello"), "https://acme.example/blog/hello");
        assert_eq!(links.asset("/img/a.jpg"), "https://acme.example/img/a.jpg");
        assert_eq!(links.asset("img/a.jpg"), "https://acme.example/img/a.jpg");
        assert_eq!(links.asset("https://cdn.example/a.jpg"), "https://cdn.example/a.jpg");
    }

    #[test]
    fn test_permalinks_relative() {
        let links = Permalinks::default();
        assert_eq!(links.post("hello"), "/blog/hello");
        assert_eq!(links.asset("/img/a.jpg"), "/img/a.jpg");
    }

    #[test]
    fn test_item_list_positions_and_limit() {
        let posts = sample_posts();
        let links = Permalinks::new("https://acme.example", "/blog");
        let list = item_list(&posts, 2, &links);

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].position, 1);
        assert_eq!(list.items[1].position, 2);
        assert_eq!(list.items[0].url, "https://acme.example/blog/a");
        assert_eq!(list.items[0].name, "Post a");
        assert_eq!(list.items[0].image, "https://acme.example/images/a.jpg");
    }

    #[test]
    fn test_item_list_json_shape() {
        let posts = sample_posts();
        let list = item_list(&posts, 10, &Permalinks::default());
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["@context"], "https://schema.org");
        assert_eq!(json["@type"], "ItemList");
        assert_eq!(json["itemListElement"].as_array().unwrap().len(), 3);
        assert_eq!(json["itemListElement"][2]["@type"], "ListItem");
        assert_eq!(json["itemListElement"][2]["position"], 3);
    }

    #[test]
    fn test_item_list_empty() {
        let list = item_list(std::iter::empty(), 10, &Permalinks::default());
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_article() {
        let record = content("c", "2024-01-20", &["fashion", "pets"], "awareness", 8);
        let links = Permalinks::new("https://acme.example", "/blog");
        let posting = article(&record, &Labels::default(), &links);

        assert_eq!(posting.headline, "Post c");
        assert_eq!(posting.date_published, "2024-01-20");
        assert_eq!(posting.time_required, "PT8M");
        assert_eq!(posting.article_section, vec!["Fashion & Apparel", "pets"]);
        assert_eq!(posting.author.name, "Dana Ortiz");
        assert_eq!(posting.image, "https://acme.example/images/og/c.jpg");
        assert_eq!(posting.main_entity_of_page, "https://acme.example/blog/c");

        let json = serde_json::to_value(&posting).unwrap();
        assert_eq!(json["@type"], "BlogPosting");
        assert_eq!(json["datePublished"], "2024-01-20");
        assert_eq!(json["mainEntityOfPage"], "https://acme.example/blog/c");
    }
}
