use std::collections::BTreeMap;

use super::DispatchError;
use crate::monday::api_types::ApiStatusSettings;

/// Per-board label table of a status column: label index -> label text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLabels {
  labels: BTreeMap<u32, String>,
}

impl StatusLabels {
  /// Parse a column's raw settings blob.
  pub fn from_settings(settings: &str) -> Result<Self, DispatchError> {
    let parsed: ApiStatusSettings = serde_json::from_str(settings)?;

    let mut labels = BTreeMap::new();
    for (index, label) in parsed.into_labels() {
      let index = index
        .parse::<u32>()
        .map_err(|_| DispatchError::InvalidLabelIndex(index.clone()))?;
      labels.insert(index, label);
    }

    Ok(Self { labels })
  }

  pub fn index_of(&self, label: &str) -> Option<u32> {
    self
      .labels
      .iter()
      .find(|(_, text)| text.as_str() == label)
      .map(|(index, _)| *index)
  }

  pub fn label_of(&self, index: u32) -> Option<&str> {
    self.labels.get(&index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}

impl<S: Into<String>> FromIterator<(u32, S)> for StatusLabels {
  fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
    Self {
      labels: iter.into_iter().map(|(i, s)| (i, s.into())).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_wrapped_settings() {
    let labels =
      StatusLabels::from_settings(r#"{"labels":{"0":"Working on it","1":"Done","2":"Stuck"}}"#)
        .unwrap();
    assert_eq!(labels.len(), 3);
    assert_eq!(labels.index_of("Done"), Some(1));
    assert_eq!(labels.label_of(2), Some("Stuck"));
  }

  #[test]
  fn test_parse_bare_settings() {
    let labels = StatusLabels::from_settings(r#"{"0":"Working on it","1":"Done"}"#).unwrap();
    assert_eq!(labels.index_of("Working on it"), Some(0));
  }

  #[test]
  fn test_label_lookup_is_exact() {
    let labels: StatusLabels = [(0, "Done")].into_iter().collect();
    assert_eq!(labels.index_of("done"), None);
    assert_eq!(labels.label_of(7), None);
  }

  #[test]
  fn test_non_numeric_index_rejected() {
    let err = StatusLabels::from_settings(r#"{"labels":{"first":"Done"}}"#).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidLabelIndex(_)));
  }

  #[test]
  fn test_malformed_settings_rejected() {
    let err = StatusLabels::from_settings("not json").unwrap_err();
    assert!(matches!(err, DispatchError::InvalidSettings(_)));
  }
}
