use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Prefix that marks a group key as a placeholder rather than a real
/// product code. Output consumers rely on it: prefixed keys are emitted
/// with a `null` code.
pub const SYNTHETIC_KEY_PREFIX: &str = "No-";

/// Builds a synthetic group key from an allocated sequence string.
#[must_use]
pub fn synthetic_key(sequence: &str) -> String {
    format!("{SYNTHETIC_KEY_PREFIX}{sequence}")
}

/// Returns `true` when `key` was produced by [`synthetic_key`].
#[must_use]
pub fn is_synthetic_key(key: &str) -> bool {
    key.starts_with(SYNTHETIC_KEY_PREFIX)
}

/// Maps a group key to the code reported in the catalog.
#[must_use]
pub fn code_for_key(key: &str) -> Option<String> {
    if is_synthetic_key(key) {
        None
    } else {
        Some(key.to_owned())
    }
}

/// How listings are linked to groups during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact product-code grouping; listings without a code are dropped.
    #[default]
    Code,
    /// Fuzzy product-name grouping, with exact codes honoured when present.
    Name,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Code => write!(f, "code"),
            MatchMode::Name => write!(f, "name"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" => Ok(MatchMode::Code),
            "name" => Ok(MatchMode::Name),
            other => Err(CoreError::InvalidMatchMode(other.to_owned())),
        }
    }
}

/// Per-source price statistics for one catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// The representative (lowest first-seen) price for the source.
    pub target: Option<f64>,
}

/// One deduplicated product in the emitted catalog.
///
/// Every map is keyed by source name and carries an entry for every source
/// that took part in the run, `null` where that source contributed nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductItem {
    /// Product code, or `None` when the group was keyed synthetically.
    pub code: Option<String>,
    pub name: BTreeMap<String, Option<String>>,
    pub price: BTreeMap<String, PriceSummary>,
    pub url: BTreeMap<String, Option<String>>,
    pub image_url: BTreeMap<String, Option<String>>,
}

impl ProductItem {
    /// Returns the price summary for `source`, if the source took part in the run.
    #[must_use]
    pub fn price_for(&self, source: &str) -> Option<&PriceSummary> {
        self.price.get(source)
    }

    /// Returns the representative name `source` contributed, if any.
    #[must_use]
    pub fn name_for(&self, source: &str) -> Option<&str> {
        self.name.get(source).and_then(Option::as_deref)
    }

    /// Returns the sources that contributed at least one priced listing.
    #[must_use]
    pub fn priced_sources(&self) -> Vec<&str> {
        self.price
            .iter()
            .filter(|(_, summary)| summary.target.is_some())
            .map(|(source, _)| source.as_str())
            .collect()
    }
}
