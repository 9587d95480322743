//! `[labels]` section configuration.
//!
//! Extra display labels merged over the built-in funnel and vertical tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[labels]` section in pressroom.toml.
///
/// # Example
/// ```toml
/// [labels.funnel]
/// awareness = "Getting Started"
///
/// [labels.vertical]
/// pets = "Pet Supplies"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelsConfig {
    /// Funnel stage key → display label.
    #[serde(default)]
    pub funnel: BTreeMap<String, String>,

    /// Vertical key → display label.
    #[serde(default)]
    pub vertical: BTreeMap<String, String>,
}
