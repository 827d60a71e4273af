//! Serde types matching the JSON payloads the remote service stores in cells
//! and column settings.
//!
//! These are kept apart from `ColumnValue` so that deserialization can stay
//! lenient (extra fields such as `changed_at` are ignored) while the domain
//! type stays strict.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Column settings
// ============================================================================

/// Settings blob of a status column.
///
/// The service sends `{"labels": {"0": "Working on it", ...}, ...}`; a bare
/// index-to-label map is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiStatusSettings {
  Wrapped { labels: BTreeMap<String, String> },
  Bare(BTreeMap<String, String>),
}

impl ApiStatusSettings {
  pub fn into_labels(self) -> BTreeMap<String, String> {
    match self {
      ApiStatusSettings::Wrapped { labels } => labels,
      ApiStatusSettings::Bare(labels) => labels,
    }
  }
}

// ============================================================================
// Cell payloads
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiLongTextValue {
  #[serde(default)]
  pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiDateValue {
  pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiLinkValue {
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiStatusValue {
  pub index: u32,
}
