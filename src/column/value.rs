use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fmt;

use super::{ColumnCodec, DispatchError, DATE_FORMAT};
use crate::monday::api_types::{ApiDateValue, ApiLinkValue, ApiLongTextValue, ApiStatusValue};

/// Typed value of one cell. The variant follows the owning column's type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
  LongText(String),
  Number(f64),
  Text(String),
  /// Writing a name value renames the item
  Name(String),
  Date(NaiveDate),
  Link { url: String, text: Option<String> },
  Status { index: u32, label: String },
}

/// Plain value as callers see it after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
  Text(String),
  Number(f64),
  Date(String),
  Link { url: String, text: Option<String> },
  Label(String),
}

impl fmt::Display for RawValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RawValue::Text(s) | RawValue::Date(s) | RawValue::Label(s) => f.write_str(s),
      RawValue::Number(n) => write!(f, "{}", n),
      RawValue::Link { url, text: Some(text) } => write!(f, "{} ({})", url, text),
      RawValue::Link { url, text: None } => f.write_str(url),
    }
  }
}

impl ColumnValue {
  /// JSON payload submitted to the remote service
  pub fn to_payload(&self) -> Value {
    match self {
      ColumnValue::LongText(text) => json!(ApiLongTextValue { text: text.clone() }),
      // The service stores numbers as strings
      ColumnValue::Number(n) => Value::String(n.to_string()),
      ColumnValue::Text(text) | ColumnValue::Name(text) => Value::String(text.clone()),
      ColumnValue::Date(date) => json!(ApiDateValue {
        date: date.format(DATE_FORMAT).to_string(),
      }),
      ColumnValue::Link { url, text } => json!(ApiLinkValue {
        url: url.clone(),
        text: text.clone(),
      }),
      ColumnValue::Status { index, .. } => json!(ApiStatusValue { index: *index }),
    }
  }

  /// Rebuild a typed value from a stored payload.
  ///
  /// Status payloads only carry the index; the label is recovered through
  /// the column's label table.
  pub fn from_payload(codec: &ColumnCodec, payload: &Value) -> Result<Self, DispatchError> {
    let value = match codec {
      ColumnCodec::LongText => {
        let stored: ApiLongTextValue = from_payload_as(codec, payload)?;
        ColumnValue::LongText(stored.text)
      }
      ColumnCodec::Numeric => {
        let n = match payload {
          Value::Number(n) => n.as_f64(),
          Value::String(s) => s.trim().parse::<f64>().ok(),
          _ => None,
        };
        ColumnValue::Number(n.ok_or_else(|| mismatch(codec, payload))?)
      }
      ColumnCodec::Text => ColumnValue::Text(string_payload(codec, payload)?),
      ColumnCodec::Name => ColumnValue::Name(string_payload(codec, payload)?),
      ColumnCodec::Date => {
        let stored: ApiDateValue = from_payload_as(codec, payload)?;
        ColumnValue::Date(parse_date(&stored.date)?)
      }
      ColumnCodec::Link => {
        let stored: ApiLinkValue = from_payload_as(codec, payload)?;
        ColumnValue::Link {
          url: stored.url,
          text: stored.text.filter(|t| !t.is_empty()),
        }
      }
      ColumnCodec::Status(labels) => {
        let stored: ApiStatusValue = from_payload_as(codec, payload)?;
        let label = labels
          .label_of(stored.index)
          .ok_or(DispatchError::UnknownIndex(stored.index))?;
        ColumnValue::Status {
          index: stored.index,
          label: label.to_string(),
        }
      }
    };
    Ok(value)
  }
}

pub(super) fn parse_date(raw: &str) -> Result<NaiveDate, DispatchError> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .map_err(|_| DispatchError::InvalidDate(raw.to_string()))
}

fn from_payload_as<T: serde::de::DeserializeOwned>(
  codec: &ColumnCodec,
  payload: &Value,
) -> Result<T, DispatchError> {
  serde_json::from_value(payload.clone()).map_err(|_| mismatch(codec, payload))
}

fn string_payload(codec: &ColumnCodec, payload: &Value) -> Result<String, DispatchError> {
  payload
    .as_str()
    .map(String::from)
    .ok_or_else(|| mismatch(codec, payload))
}

fn mismatch(codec: &ColumnCodec, payload: &Value) -> DispatchError {
  DispatchError::PayloadMismatch {
    column_type: codec.column_type().api_name(),
    payload: payload.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::column::StatusLabels;

  #[test]
  fn test_payload_shapes() {
    assert_eq!(ColumnValue::Number(80.0).to_payload(), json!("80"));
    assert_eq!(
      ColumnValue::LongText("Do more testing".into()).to_payload(),
      json!({"text": "Do more testing"})
    );
    assert_eq!(
      ColumnValue::Link {
        url: "https://github.com/".into(),
        text: None
      }
      .to_payload(),
      json!({"url": "https://github.com/"})
    );
    assert_eq!(
      ColumnValue::Status {
        index: 1,
        label: "Done".into()
      }
      .to_payload(),
      json!({"index": 1})
    );
  }

  #[test]
  fn test_numeric_payload_accepts_number_or_string() {
    assert_eq!(
      ColumnValue::from_payload(&ColumnCodec::Numeric, &json!(12.5)).unwrap(),
      ColumnValue::Number(12.5)
    );
    assert_eq!(
      ColumnValue::from_payload(&ColumnCodec::Numeric, &json!("80")).unwrap(),
      ColumnValue::Number(80.0)
    );
  }

  #[test]
  fn test_status_payload_resolves_label() {
    let labels: StatusLabels = [(0, "Working on it"), (1, "Done")].into_iter().collect();
    let value = ColumnValue::from_payload(
      &ColumnCodec::Status(labels),
      &json!({"index": 0, "changed_at": "2024-01-01T00:00:00Z"}),
    )
    .unwrap();
    assert_eq!(
      value,
      ColumnValue::Status {
        index: 0,
        label: "Working on it".into()
      }
    );
  }

  #[test]
  fn test_mismatched_payload() {
    let err = ColumnValue::from_payload(&ColumnCodec::Date, &json!("2024-01-01")).unwrap_err();
    assert!(matches!(
      err,
      DispatchError::PayloadMismatch {
        column_type: "date",
        ..
      }
    ));
  }

  #[test]
  fn test_raw_value_display() {
    assert_eq!(RawValue::Number(80.0).to_string(), "80");
    assert_eq!(
      RawValue::Link {
        url: "https://example.com".into(),
        text: Some("label".into())
      }
      .to_string(),
      "https://example.com (label)"
    );
  }
}
