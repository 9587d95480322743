//! Consistency check between the post store and the content directory.
//!
//! Every summary in `posts.json` should have a `<slug>.json` article and every
//! article should belong to a summary. Articles are parsed in parallel.

use crate::blog::{PostStore, repository::parse_content};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use walkdir::WalkDir;

/// A single finding of the content check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("{path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("{path}: declares slug `{slug}`, expected the file stem")]
    SlugMismatch { path: PathBuf, slug: String },

    #[error("{path}: no post summary for slug `{slug}`")]
    Orphan { path: PathBuf, slug: String },

    #[error("post `{slug}` has no content file")]
    MissingContent { slug: String },
}

/// Result of `check_content`.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of article files inspected.
    pub checked: usize,
    pub issues: Vec<Issue>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Compare the store against the `*.json` files directly under `dir`.
///
/// A content directory that cannot be read yields that single issue.
pub fn check_content(store: &PostStore, dir: &Path) -> CheckReport {
    if let Err(reason) = ensure_dir(dir) {
        return CheckReport {
            checked: 0,
            issues: vec![Issue::Unreadable {
                path: dir.to_path_buf(),
                reason,
            }],
        };
    }

    let mut issues = Vec::new();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let path = entry.into_path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    files.push(path);
                }
            }
            Ok(_) => {}
            Err(err) => issues.push(Issue::Unreadable {
                path: err.path().unwrap_or(dir).to_path_buf(),
                reason: err.to_string(),
            }),
        }
    }

    let results: Vec<(String, Option<Issue>)> = files.par_iter().map(|path| inspect(store, path)).collect();

    let mut found = FxHashSet::default();
    for (stem, issue) in results {
        found.insert(stem);
        issues.extend(issue);
    }

    issues.extend(
        store
            .posts()
            .iter()
            .filter(|post| !found.contains(&post.slug))
            .map(|post| Issue::MissingContent {
                slug: post.slug.clone(),
            }),
    );

    CheckReport {
        checked: files.len(),
        issues,
    }
}

fn ensure_dir(dir: &Path) -> Result<(), String> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err("not a directory".to_owned()),
        Err(err) => Err(err.to_string()),
    }
}

/// Inspect one article file. Returns its stem and the issue found, if any.
fn inspect(store: &PostStore, path: &Path) -> (String, Option<Issue>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|raw| parse_content(path, &raw).map_err(|err| format!("{:#}", anyhow::Error::new(err))));

    let issue = match parsed {
        Err(reason) => Some(Issue::Unreadable {
            path: path.to_path_buf(),
            reason,
        }),
        Ok(content) if content.post.slug != stem => Some(Issue::SlugMismatch {
            path: path.to_path_buf(),
            slug: content.post.slug,
        }),
        Ok(content) if !store.contains(&content.post.slug) => Some(Issue::Orphan {
            path: path.to_path_buf(),
            slug: content.post.slug,
        }),
        Ok(_) => None,
    };

    (stem, issue)
}
