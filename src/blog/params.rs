//! Listing page query string parsing.
//!
//! Turns `?vertical=fashion&vertical=beauty&funnel=awareness&page=2` into a
//! `ListingQuery`. The query engine never validates its input, so this is
//! where malformed values fall back to defaults:
//!
//! | Parameter        | Repeatable | Fallback            |
//! |------------------|------------|---------------------|
//! | `vertical`       | yes        | no vertical filter  |
//! | `funnel`         | no         | no funnel filter    |
//! | `minReadingTime` | no         | `0`                 |
//! | `maxReadingTime` | no         | `100`               |
//! | `page`           | no         | `1` (also for `0`)  |

use std::borrow::Cow;

use super::query::{DEFAULT_MAX_READING_TIME, ListingQuery};

/// Split a query string into percent-decoded key/value pairs.
///
/// A leading `?` is ignored, `+` decodes to a space, and pairs that fail to
/// decode are skipped.
pub fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode(key)?.into_owned(), decode(value)?.into_owned()))
        })
}

fn decode(raw: &str) -> Option<Cow<'_, str>> {
    if raw.contains('+') {
        let spaced = raw.replace('+', " ");
        return urlencoding::decode(&spaced).ok().map(|s| Cow::Owned(s.into_owned()));
    }
    urlencoding::decode(raw).ok()
}

impl ListingQuery {
    /// Parse listing criteria from a URL query string.
    ///
    /// `limit` is the page size, which is configuration rather than a parameter.
    pub fn from_query_string(query: &str, limit: usize) -> Self {
        let mut listing = Self {
            limit,
            ..Self::default()
        };

        for (key, value) in query_pairs(query) {
            match key.as_str() {
                "vertical" if !value.is_empty() => {
                    if !listing.vertical.contains(&value) {
                        listing.vertical.push(value);
                    }
                }
                "funnel" => {
                    listing.funnel = (!value.is_empty()).then_some(value);
                }
                "minReadingTime" => {
                    listing.min_reading_time = value.trim().parse().unwrap_or(0);
                }
                "maxReadingTime" => {
                    listing.max_reading_time =
                        value.trim().parse().unwrap_or(DEFAULT_MAX_READING_TIME);
                }
                "page" => {
                    listing.page = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .filter(|&page| page > 0)
                        .unwrap_or(1);
                }
                _ => {}
            }
        }

        listing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_default() {
        assert_eq!(ListingQuery::from_query_string("", 9), ListingQuery::default());
        assert_eq!(ListingQuery::from_query_string("?", 9), ListingQuery::default());
    }

    #[test]
    fn test_full_query() {
        let query = ListingQuery::from_query_string(
            "?vertical=fashion&vertical=beauty&funnel=awareness&minReadingTime=3&maxReadingTime=12&page=2",
            6,
        );

        assert_eq!(query.vertical, vec!["fashion", "beauty"]);
        assert_eq!(query.funnel.as_deref(), Some("awareness"));
        assert_eq!(query.min_reading_time, 3);
        assert_eq!(query.max_reading_time, 12);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 6);
    }

    #[test]
    fn test_numeric_fallbacks() {
        let query = ListingQuery::from_query_string(
            "minReadingTime=abc&maxReadingTime=-4&page=next",
            9,
        );
        assert_eq!(query.min_reading_time, 0);
        assert_eq!(query.max_reading_time, 100);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_page_zero_falls_back_to_one() {
        assert_eq!(ListingQuery::from_query_string("page=0", 9).page, 1);
    }

    #[test]
    fn test_empty_values_are_no_filter() {
        let query = ListingQuery::from_query_string("vertical=&funnel=", 9);
        assert!(query.vertical.is_empty());
        assert!(query.funnel.is_none());
    }

    #[test]
    fn test_duplicate_verticals_collapsed() {
        let query = ListingQuery::from_query_string("vertical=home&vertical=home", 9);
        assert_eq!(query.vertical, vec!["home"]);
    }

    #[test]
    fn test_all_is_a_literal_tag() {
        let query = ListingQuery::from_query_string("vertical=all", 9);
        assert_eq!(query.vertical, vec!["all"]);
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let pairs: Vec<_> = query_pairs("vertical=home%20decor&funnel=ready+to+buy&flag").collect();
        assert_eq!(
            pairs,
            vec![
                ("vertical".to_string(), "home decor".to_string()),
                ("funnel".to_string(), "ready to buy".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let query = ListingQuery::from_query_string("utm_source=newsletter&page=3", 9);
        assert_eq!(query.page, 3);
    }
}
