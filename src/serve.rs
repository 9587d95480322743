//! Query API server.
//!
//! Exposes the query engine to the page layer over HTTP, built on `tiny_http`.
//! Requests are handled one at a time on the main thread; article loads run
//! on a current-thread tokio runtime.
//!
//! | Route                               | Response                     |
//! |-------------------------------------|------------------------------|
//! | `GET /api/posts?<listing params>`   | `QueryPage`                  |
//! | `GET /api/posts/featured?vertical=` | `Post` or `null`             |
//! | `GET /api/posts/<slug>`             | `PostContent` or 404         |
//! | `GET /api/posts/<slug>/related`     | `[Post]` (`?count=n`)        |
//! | `GET /api/posts/<slug>/metadata`    | `BlogPosting` or 404         |
//! | `GET /api/categories`               | `[{ key, label }]`           |
//! | `GET /api/funnels`                  | `[{ key, label }]`           |
//! | `GET /api/metadata?<listing params>`| `ItemList` for that page     |
//! | `GET /feed.xml`                     | RSS 2.0                      |
//! | `GET /sitemap.xml`                  | sitemap                      |
//!
//! `featured` is a reserved segment, so no post can be fetched under that slug.

use crate::{
    blog::{ListingQuery, SiteEngine, metadata, params::query_pairs},
    config::SiteConfig,
    generator, log,
};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::{borrow::Cow, net::SocketAddr, sync::Arc};
use tiny_http::{Header, Method, Request, Response, Server};
use tokio::runtime::Runtime;

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the query API server. Blocks until Ctrl+C is received.
pub fn serve_site(engine: &SiteEngine, config: &SiteConfig) -> Result<()> {
    let interface: std::net::IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    log!("serve"; "http://{}", addr);

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, engine, config, &runtime) {
            log!("serve"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Routing
// ============================================================================

/// A routed response body.
#[derive(Debug, PartialEq)]
enum Reply {
    Json(String),
    Xml(String),
    NotFound,
    MethodNotAllowed,
    ServerError,
}

impl Reply {
    fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }

    const fn status(&self) -> u16 {
        match self {
            Self::Json(_) | Self::Xml(_) => 200,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::ServerError => 500,
        }
    }
}

/// Handle a single HTTP request.
fn handle_request(
    request: Request,
    engine: &SiteEngine,
    config: &SiteConfig,
    runtime: &Runtime,
) -> Result<()> {
    let method = request.method().clone();
    let url = request.url().to_owned();

    let reply = if method == Method::Get {
        route(&url, engine, config, runtime).unwrap_or_else(|e| {
            log!("error"; "{url}: {e:#}");
            Reply::ServerError
        })
    } else {
        Reply::MethodNotAllowed
    };

    log!("serve"; "{} {} {}", method, url, reply.status());
    respond(request, reply)
}

/// Resolve a request URL to a reply.
fn route(url: &str, engine: &SiteEngine, config: &SiteConfig, runtime: &Runtime) -> Result<Reply> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let segments: Vec<Cow<'_, str>> = path
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment)))
        .collect();
    let segments: Vec<&str> = segments.iter().map(Cow::as_ref).collect();

    match segments.as_slice() {
        ["api", "posts"] => {
            let listing = ListingQuery::from_query_string(query, config.content.page_size);
            Reply::json(&engine.filtered_query(&listing))
        }
        ["api", "posts", "featured"] => {
            let vertical: Vec<String> = query_pairs(query)
                .filter(|(key, value)| key == "vertical" && !value.is_empty())
                .map(|(_, value)| value)
                .collect();
            Reply::json(&engine.featured_post(&vertical))
        }
        ["api", "posts", slug] => match runtime.block_on(engine.post_content_by_slug(slug)) {
            Some(content) => Reply::json(&content),
            None => Ok(Reply::NotFound),
        },
        ["api", "posts", slug, "related"] => {
            let count = query_pairs(query)
                .find(|(key, _)| key == "count")
                .and_then(|(_, value)| value.parse().ok())
                .unwrap_or(config.content.related_count);
            Reply::json(&engine.related_posts(slug, count))
        }
        ["api", "posts", slug, "metadata"] => {
            match runtime.block_on(engine.post_content_by_slug(slug)) {
                Some(content) => Reply::json(&metadata::article(
                    &content,
                    engine.labels(),
                    engine.permalinks(),
                )),
                None => Ok(Reply::NotFound),
            }
        }
        ["api", "categories"] => Reply::json(&engine.category_labels()),
        ["api", "funnels"] => Reply::json(&engine.funnel_labels()),
        ["api", "metadata"] => {
            let listing = ListingQuery::from_query_string(query, config.content.page_size);
            let page = engine.filtered_query(&listing);
            Reply::json(&engine.structured_metadata(&page.posts, config.content.metadata_limit))
        }
        ["feed.xml"] => Ok(Reply::Xml(generator::rss_feed(engine, config)?)),
        ["sitemap.xml"] => Ok(Reply::Xml(generator::sitemap(engine, config)?)),
        _ => Ok(Reply::NotFound),
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn respond(request: Request, reply: Reply) -> Result<()> {
    let status = reply.status();
    let (body, content_type) = match reply {
        Reply::Json(body) => (body, "application/json; charset=utf-8"),
        Reply::Xml(body) => (body, "application/xml; charset=utf-8"),
        Reply::NotFound => (r#"{"error":"not found"}"#.to_owned(), "application/json; charset=utf-8"),
        Reply::MethodNotAllowed => (
            r#"{"error":"method not allowed"}"#.to_owned(),
            "application/json; charset=utf-8",
        ),
        Reply::ServerError => (
            r#"{"error":"internal error"}"#.to_owned(),
            "application/json; charset=utf-8",
        ),
    };

    let header = Header::from_bytes("Content-Type", content_type)
        .map_err(|()| anyhow!("invalid Content-Type header `{content_type}`"))?;
    let response = Response::from_string(body)
        .with_status_code(status)
        .with_header(header);

    request.respond(response)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::{
        FsContentRepository, PostStore, QueryEngine, test_support::{content, sample_posts},
    };
    use std::fs;

    struct Fixture {
        _dir: tempfile::TempDir,
        engine: SiteEngine,
        config: SiteConfig,
        runtime: Runtime,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let record = content("a", "2024-01-10", &["fashion"], "awareness", 5);
        fs::write(dir.path().join("a.json"), serde_json::to_string(&record).unwrap()).unwrap();

        let mut config = SiteConfig::default();
        config.site.url = Some("https://acme.example".into());

        let engine = QueryEngine::new(
            PostStore::from_posts(sample_posts()).unwrap(),
            FsContentRepository::new(dir.path()),
        )
        .with_permalinks(config.permalinks());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        Fixture {
            _dir: dir,
            engine,
            config,
            runtime,
        }
    }

    fn get(f: &Fixture, url: &str) -> Reply {
        route(url, &f.engine, &f.config, &f.runtime).unwrap()
    }

    fn json(reply: Reply) -> serde_json::Value {
        match reply {
            Reply::Json(body) => serde_json::from_str(&body).unwrap(),
            other => panic!("expected JSON, got {other:?}"),
        }
    }

    #[test]
    fn test_route_listing() {
        let f = fixture();
        let body = json(get(&f, "/api/posts?vertical=fashion"));

        assert_eq!(body["total"], 2);
        assert_eq!(body["hasMore"], false);
        assert_eq!(body["posts"][0]["slug"], "c");
        assert_eq!(body["posts"][1]["slug"], "a");
    }

    #[test]
    fn test_route_featured() {
        let f = fixture();
        assert_eq!(json(get(&f, "/api/posts/featured"))["slug"], "b");
        assert_eq!(json(get(&f, "/api/posts/featured?vertical=fashion"))["slug"], "c");
        assert!(json(get(&f, "/api/posts/featured?vertical=food")).is_null());
    }

    #[test]
    fn test_route_post_content() {
        let f = fixture();
        let body = json(get(&f, "/api/posts/a"));
        assert_eq!(body["slug"], "a");
        assert_eq!(body["content"]["cta"]["link"], "/demo");

        assert_eq!(get(&f, "/api/posts/b"), Reply::NotFound);
        assert_eq!(get(&f, "/api/posts/..%2Fsecret"), Reply::NotFound);
    }

    #[test]
    fn test_route_post_metadata() {
        let f = fixture();
        let body = json(get(&f, "/api/posts/a/metadata"));
        assert_eq!(body["@type"], "BlogPosting");
        assert_eq!(get(&f, "/api/posts/b/metadata"), Reply::NotFound);
    }

    #[test]
    fn test_route_related() {
        let f = fixture();
        let body = json(get(&f, "/api/posts/c/related"));
        assert_eq!(body.as_array().unwrap().len(), 2);

        let body = json(get(&f, "/api/posts/c/related?count=1"));
        assert_eq!(body.as_array().unwrap().len(), 1);

        let body = json(get(&f, "/api/posts/missing/related"));
        assert!(body.as_array().unwrap().is_empty());
    }

    #[test]
    fn test_route_categories_and_metadata() {
        let f = fixture();
        let categories = json(get(&f, "/api/categories"));
        assert_eq!(categories[0]["key"], "beauty");
        assert_eq!(categories[0]["label"], "Beauty & Cosmetics");

        let funnels = json(get(&f, "/api/funnels"));
        assert_eq!(funnels[0]["key"], "awareness");
        assert_eq!(funnels[0]["label"], "Getting Started");
        assert_eq!(funnels[1]["key"], "decision");
        assert_eq!(funnels.as_array().unwrap().len(), 2);

        let list = json(get(&f, "/api/metadata?funnel=awareness"));
        assert_eq!(list["@type"], "ItemList");
        assert_eq!(list["itemListElement"][0]["url"], "https://acme.example/blog/c");
    }

    #[test]
    fn test_route_feeds() {
        let f = fixture();
        assert!(matches!(get(&f, "/feed.xml"), Reply::Xml(body) if body.contains("<rss")));
        assert!(matches!(get(&f, "/sitemap.xml"), Reply::Xml(body) if body.contains("<urlset")));
    }

    #[test]
    fn test_route_unknown() {
        let f = fixture();
        assert_eq!(get(&f, "/"), Reply::NotFound);
        assert_eq!(get(&f, "/api/posts/a/b/c"), Reply::NotFound);
    }

    #[test]
    fn test_reply_status() {
        assert_eq!(Reply::Json(String::new()).status(), 200);
        assert_eq!(Reply::NotFound.status(), 404);
        assert_eq!(Reply::MethodNotAllowed.status(), 405);
        assert_eq!(Reply::ServerError.status(), 500);
    }

    #[test]
    fn test_route_feed_without_url_is_error() {
        let mut f = fixture();
        f.config.site.url = None;
        assert!(route("/feed.xml", &f.engine, &f.config, &f.runtime).is_err());
    }
}
