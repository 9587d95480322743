//! Post records.
//!
//! `Post` is the summary record held by the store and used for listings.
//! `PostContent` is the full article, loaded per slug from a content repository.
//! Both use the camelCase JSON keys of the site's data files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Summary record for one blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique URL-safe identifier.
    pub slug: String,

    pub title: String,

    pub excerpt: String,

    /// Publication date (`YYYY-MM-DD`), the listing sort key.
    pub publish_date: NaiveDate,

    /// Category tags. Never empty.
    pub vertical: Vec<String>,

    /// Funnel stage tag.
    pub funnel: String,

    /// Audience tags. Descriptive only.
    #[serde(default)]
    pub persona: Vec<String>,

    /// Hero image path.
    pub hero: String,

    /// Estimated minutes to read. At least 1.
    pub reading_time: u32,
}

impl Post {
    /// Whether the post carries any of the given vertical tags.
    pub fn in_any_vertical<S: AsRef<str>>(&self, verticals: &[S]) -> bool {
        self.vertical
            .iter()
            .any(|tag| verticals.iter().any(|wanted| wanted.as_ref() == tag))
    }
}

/// Full record for one blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostContent {
    #[serde(flatten)]
    pub post: Post,

    pub author: String,

    pub og_image: String,

    pub canonical: String,

    pub content: ArticleBody,
}

/// Body of an article: intro, ordered sections and a closing call to action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleBody {
    pub intro: String,

    #[serde(default)]
    pub sections: Vec<Section>,

    pub cta: CallToAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub text: String,
    pub link: String,
}
