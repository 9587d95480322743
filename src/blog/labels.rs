//! Display labels for funnel stages and verticals.
//!
//! `LabelMap::lookup` never fails: a key without a label is returned as-is,
//! so new tags in the data render with their raw name until a label is added.

use rustc_hash::FxHashMap;

use crate::config::LabelsConfig;

/// Built-in funnel stage labels.
const FUNNEL_LABELS: &[(&str, &str)] = &[
    ("awareness", "Getting Started"),
    ("consideration", "Evaluating Solutions"),
    ("decision", "Ready to Buy"),
];

/// Built-in vertical labels.
const VERTICAL_LABELS: &[(&str, &str)] = &[
    ("fashion", "Fashion & Apparel"),
    ("beauty", "Beauty & Cosmetics"),
    ("home", "Home & Living"),
    ("electronics", "Consumer Electronics"),
    ("food", "Food & Beverage"),
];

/// Key → label table.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: FxHashMap<String, String>,
}

impl LabelMap {
    fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            labels: pairs
                .iter()
                .map(|(key, label)| ((*key).to_owned(), (*label).to_owned()))
                .collect(),
        }
    }

    /// Add entries, replacing existing labels for the same keys.
    fn extend<'a>(&mut self, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
        self.labels
            .extend(entries.into_iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Label for `key`, or `key` itself when no label is known.
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map_or(key, String::as_str)
    }
}

/// The two label tables used by the blog.
#[derive(Debug, Clone)]
pub struct Labels {
    pub funnel: LabelMap,
    pub vertical: LabelMap,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            funnel: LabelMap::from_pairs(FUNNEL_LABELS),
            vertical: LabelMap::from_pairs(VERTICAL_LABELS),
        }
    }
}

/// Position of `stage` in the buying journey. Stages without a built-in
/// label sort after the known ones.
pub fn funnel_rank(stage: &str) -> usize {
    FUNNEL_LABELS
        .iter()
        .position(|(key, _)| *key == stage)
        .unwrap_or(FUNNEL_LABELS.len())
}

impl Labels {
    /// Built-in labels with the `[labels]` config tables merged over them.
    pub fn from_config(config: &LabelsConfig) -> Self {
        let mut labels = Self::default();
        labels.funnel.extend(&config.funnel);
        labels.vertical.extend(&config.vertical);
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_funnel_rank() {
        assert!(funnel_rank("awareness") < funnel_rank("consideration"));
        assert!(funnel_rank("consideration") < funnel_rank("decision"));
        assert_eq!(funnel_rank("retention"), FUNNEL_LABELS.len());
    }

    #[test]
    fn test_builtin_lookup() {
        let labels = Labels::default();
        assert_eq!(labels.funnel.lookup("decision"), "Ready to Buy");
        assert_eq!(labels.vertical.lookup("beauty"), "Beauty & Cosmetics");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let labels = Labels::default();
        assert_eq!(labels.vertical.lookup("pets"), "pets");
        assert_eq!(labels.funnel.lookup(""), "");
    }

    #[test]
    fn test_config_overrides_and_extends() {
        let mut config = LabelsConfig::default();
        config.funnel.insert("awareness".into(), "Start Here".into());
        config.vertical.insert("pets".into(), "Pet Supplies".into());

        let labels = Labels::from_config(&config);
        assert_eq!(labels.funnel.lookup("awareness"), "Start Here");
        assert_eq!(labels.funnel.lookup("decision"), "Ready to Buy");
        assert_eq!(labels.vertical.lookup("pets"), "Pet Supplies");
    }
}
