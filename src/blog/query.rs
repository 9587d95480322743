//! Query engine over the post store.
//!
//! Every operation is a pure read of the immutable store; results borrow from
//! it. The only asynchronous call is `post_content_by_slug`, which goes to the
//! content repository.
//!
//! | Operation               | Result                                 |
//! |-------------------------|----------------------------------------|
//! | `filtered_query`        | one page of matching posts + paging    |
//! | `featured_post`         | newest post, optionally per vertical   |
//! | `related_posts`         | newest posts sharing vertical / funnel |
//! | `post_content_by_slug`  | full article or `None`                 |
//! | `all_categories`        | distinct vertical tags                 |
//! | `funnel_labels`         | distinct funnel stages with labels     |
//! | `structured_metadata`   | schema.org `ItemList`                  |

use educe::Educe;
use rustc_hash::FxHashSet;
use serde::Serialize;

use super::{
    labels::{Labels, funnel_rank},
    metadata::{self, ItemList, Permalinks},
    repository::ContentRepository,
    store::PostStore,
    types::{Post, PostContent},
};
use crate::log;

/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: usize = 9;
/// Default upper reading time bound, in minutes.
pub const DEFAULT_MAX_READING_TIME: u32 = 100;
/// Default number of related posts.
pub const DEFAULT_RELATED_COUNT: usize = 3;
/// Default number of structured metadata entries.
pub const DEFAULT_METADATA_LIMIT: usize = 10;

// ============================================================================
// Criteria & Results
// ============================================================================

/// Filter and paging criteria for `filtered_query`.
#[derive(Debug, Clone, PartialEq, Eq, Educe)]
#[educe(Default)]
pub struct ListingQuery {
    /// Keep posts tagged with any of these verticals. Empty = no filter.
    pub vertical: Vec<String>,

    /// Keep posts in this funnel stage. `None` = no filter.
    pub funnel: Option<String>,

    /// Inclusive lower reading time bound.
    pub min_reading_time: u32,

    /// Inclusive upper reading time bound.
    #[educe(Default = DEFAULT_MAX_READING_TIME)]
    pub max_reading_time: u32,

    /// 1-based page number. Page 0 is treated like page 1.
    #[educe(Default = 1)]
    pub page: usize,

    /// Page size.
    #[educe(Default = DEFAULT_PAGE_SIZE)]
    pub limit: usize,
}

impl ListingQuery {
    /// Whether a post passes the vertical, funnel and reading time filters.
    pub fn matches(&self, post: &Post) -> bool {
        (self.vertical.is_empty() || post.in_any_vertical(&self.vertical))
            && self.funnel.as_ref().is_none_or(|funnel| *funnel == post.funnel)
            && (self.min_reading_time..=self.max_reading_time).contains(&post.reading_time)
    }

    /// Index of the first post on the requested page.
    fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage<'a> {
    pub posts: Vec<&'a Post>,

    /// Number of posts matching the filters, across all pages.
    pub total: usize,

    /// Whether later pages hold more posts.
    pub has_more: bool,
}

/// A vertical tag with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category<'a> {
    pub key: &'a str,
    pub label: &'a str,
}

// ============================================================================
// Engine
// ============================================================================

/// Stateless queries over an immutable post store.
///
/// The store, labels, permalinks and content repository are injected at
/// construction; the engine owns no other state.
#[derive(Debug)]
pub struct QueryEngine<R> {
    store: PostStore,
    labels: Labels,
    links: Permalinks,
    repository: R,
}

impl<R: ContentRepository> QueryEngine<R> {
    /// Engine with built-in labels and relative `/blog/` permalinks.
    pub fn new(store: PostStore, repository: R) -> Self {
        Self {
            store,
            labels: Labels::default(),
            links: Permalinks::default(),
            repository,
        }
    }

    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_permalinks(mut self, links: Permalinks) -> Self {
        self.links = links;
        self
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn permalinks(&self) -> &Permalinks {
        &self.links
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// All posts, newest first.
    pub fn newest_first(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.store.posts().iter().collect();
        sort_newest_first(&mut posts);
        posts
    }

    /// Filter, sort newest first and cut out the requested page.
    pub fn filtered_query(&self, query: &ListingQuery) -> QueryPage<'_> {
        let mut matches: Vec<&Post> = self
            .store
            .posts()
            .iter()
            .filter(|post| query.matches(post))
            .collect();
        sort_newest_first(&mut matches);

        let total = matches.len();
        let start = query.offset();
        let end = start.saturating_add(query.limit);

        let posts = if start < total {
            matches[start..end.min(total)].to_vec()
        } else {
            Vec::new()
        };

        QueryPage {
            posts,
            total,
            has_more: end < total,
        }
    }

    /// Newest post, restricted to the given verticals when any are given.
    ///
    /// Posts sharing the newest date resolve to the one listed first in the store.
    pub fn featured_post<S: AsRef<str>>(&self, vertical: &[S]) -> Option<&Post> {
        self.store
            .posts()
            .iter()
            .filter(|post| vertical.is_empty() || post.in_any_vertical(vertical))
            .reduce(|best, post| {
                if post.publish_date > best.publish_date {
                    post
                } else {
                    best
                }
            })
    }

    /// Up to `count` newest posts sharing a vertical or the funnel stage with `slug`.
    ///
    /// An unknown slug has no relations.
    pub fn related_posts(&self, slug: &str, count: usize) -> Vec<&Post> {
        let Some(current) = self.store.get(slug) else {
            return Vec::new();
        };

        let mut related: Vec<&Post> = self
            .store
            .posts()
            .iter()
            .filter(|post| post.slug != current.slug)
            .filter(|post| post.funnel == current.funnel || post.in_any_vertical(&current.vertical))
            .collect();
        sort_newest_first(&mut related);
        related.truncate(count);
        related
    }

    /// Full article for `slug`.
    ///
    /// Load failures are logged and reported as `None`, like a missing record.
    pub async fn post_content_by_slug(&self, slug: &str) -> Option<PostContent> {
        match self.repository.get(slug).await {
            Ok(content) => content,
            Err(err) => {
                log!("content"; "{:#}", anyhow::Error::new(err));
                None
            }
        }
    }

    /// Distinct vertical tags in first-seen order.
    pub fn all_categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();
        self.store
            .posts()
            .iter()
            .flat_map(|post| post.vertical.iter())
            .map(String::as_str)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }

    /// Distinct vertical tags with display labels, sorted by label.
    pub fn category_labels(&self) -> Vec<Category<'_>> {
        let mut categories: Vec<Category<'_>> = self
            .all_categories()
            .into_iter()
            .map(|key| Category {
                key,
                label: self.labels.vertical.lookup(key),
            })
            .collect();
        categories.sort_by(|a, b| a.label.cmp(b.label));
        categories
    }

    /// Distinct funnel stages with display labels, in journey order.
    pub fn funnel_labels(&self) -> Vec<Category<'_>> {
        let mut seen = FxHashSet::default();
        let mut stages: Vec<Category<'_>> = self
            .store
            .posts()
            .iter()
            .map(|post| post.funnel.as_str())
            .filter(|stage| seen.insert(*stage))
            .map(|key| Category {
                key,
                label: self.labels.funnel.lookup(key),
            })
            .collect();
        stages.sort_by(|a, b| {
            funnel_rank(a.key)
                .cmp(&funnel_rank(b.key))
                .then_with(|| a.key.cmp(b.key))
        });
        stages
    }

    /// `ItemList` metadata for the first `limit` posts of a listing.
    pub fn structured_metadata(&self, posts: &[&Post], limit: usize) -> ItemList {
        metadata::item_list(posts.iter().copied(), limit, &self.links)
    }
}

/// Sort by publish date, newest first. Stable: same-day posts keep store order.
fn sort_newest_first(posts: &mut [&Post]) {
    posts.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}

// ============================================================================
// Tests
// ============================================================================
