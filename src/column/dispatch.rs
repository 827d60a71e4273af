use serde_json::Value;

use super::value::parse_date;
use super::{ColumnCodec, ColumnType, ColumnValue, DispatchError, RawValue, StatusLabels, DATE_FORMAT};
use crate::monday::types::Column;

impl ColumnCodec {
  /// Build the codec for a column as reported by the remote service.
  ///
  /// Status columns read their label table from `settings_str`.
  pub fn for_column(column: &Column) -> Result<Self, DispatchError> {
    let column_type = ColumnType::from_api(&column.column_type)
      .ok_or_else(|| DispatchError::Unsupported(column.column_type.clone()))?;

    match ColumnCodec::plain(column_type) {
      Some(codec) => Ok(codec),
      None => {
        let settings = column
          .settings_str
          .as_deref()
          .ok_or(DispatchError::MissingSettings)?;
        Ok(ColumnCodec::Status(StatusLabels::from_settings(settings)?))
      }
    }
  }
}

/// Encode a caller-supplied raw value for a column.
///
/// Returns `Ok(None)` when `raw` is absent: empty upstream fields are a no-op,
/// decided before any type-specific handling. `link_text` is only used by
/// link columns.
pub fn encode(
  codec: &ColumnCodec,
  raw: Option<&str>,
  link_text: Option<&str>,
) -> Result<Option<ColumnValue>, DispatchError> {
  let Some(raw) = raw else {
    return Ok(None);
  };

  let value = match codec {
    ColumnCodec::LongText => ColumnValue::LongText(raw.to_string()),
    ColumnCodec::Numeric => {
      let n = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DispatchError::InvalidNumber(raw.to_string()))?;
      ColumnValue::Number(n)
    }
    ColumnCodec::Text => ColumnValue::Text(raw.to_string()),
    ColumnCodec::Name => ColumnValue::Name(raw.to_string()),
    ColumnCodec::Date => ColumnValue::Date(parse_date(raw)?),
    ColumnCodec::Link => ColumnValue::Link {
      url: raw.to_string(),
      text: link_text.filter(|t| !t.is_empty()).map(String::from),
    },
    ColumnCodec::Status(labels) => {
      let index = labels
        .index_of(raw)
        .ok_or_else(|| DispatchError::UnknownLabel(raw.to_string()))?;
      ColumnValue::Status {
        index,
        label: raw.to_string(),
      }
    }
  };

  Ok(Some(value))
}

/// Decode a typed value back into the plain value a caller works with.
///
/// Status values are decoded from their index through the label table, not
/// from the label they carry.
pub fn decode(codec: &ColumnCodec, value: &ColumnValue) -> Result<RawValue, DispatchError> {
  let raw = match (codec, value) {
    (ColumnCodec::LongText, ColumnValue::LongText(text))
    | (ColumnCodec::Text, ColumnValue::Text(text))
    | (ColumnCodec::Name, ColumnValue::Name(text)) => RawValue::Text(text.clone()),
    (ColumnCodec::Numeric, ColumnValue::Number(n)) => RawValue::Number(*n),
    (ColumnCodec::Date, ColumnValue::Date(date)) => {
      RawValue::Date(date.format(DATE_FORMAT).to_string())
    }
    (ColumnCodec::Link, ColumnValue::Link { url, text }) => RawValue::Link {
      url: url.clone(),
      text: text.clone(),
    },
    (ColumnCodec::Status(labels), ColumnValue::Status { index, .. }) => {
      let label = labels
        .label_of(*index)
        .ok_or(DispatchError::UnknownIndex(*index))?;
      RawValue::Label(label.to_string())
    }
    (codec, value) => {
      return Err(DispatchError::ValueMismatch {
        column_type: codec.column_type().api_name(),
        value: value_kind(value),
      })
    }
  };
  Ok(raw)
}

/// Decode a payload exactly as stored by the remote service.
pub fn decode_payload(codec: &ColumnCodec, payload: &Value) -> Result<RawValue, DispatchError> {
  decode(codec, &ColumnValue::from_payload(codec, payload)?)
}

fn value_kind(value: &ColumnValue) -> &'static str {
  match value {
    ColumnValue::LongText(_) => "long-text",
    ColumnValue::Number(_) => "numeric",
    ColumnValue::Text(_) => "text",
    ColumnValue::Name(_) => "name",
    ColumnValue::Date(_) => "date",
    ColumnValue::Link { .. } => "link",
    ColumnValue::Status { .. } => "status",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::monday::types::ColumnId;
  use serde_json::json;

  fn status_codec() -> ColumnCodec {
    ColumnCodec::Status([(0, "Working on it"), (1, "Done")].into_iter().collect())
  }

  fn round_trip(codec: &ColumnCodec, raw: &str, link_text: Option<&str>) -> RawValue {
    let value = encode(codec, Some(raw), link_text).unwrap().unwrap();
    decode(codec, &value).unwrap()
  }

  #[test]
  fn test_text_types_round_trip() {
    for codec in [ColumnCodec::LongText, ColumnCodec::Text, ColumnCodec::Name] {
      assert_eq!(
        round_trip(&codec, "Do more testing", None),
        RawValue::Text("Do more testing".into())
      );
    }
  }

  #[test]
  fn test_numeric_round_trip() {
    assert_eq!(round_trip(&ColumnCodec::Numeric, "80", None), RawValue::Number(80.0));
    assert_eq!(round_trip(&ColumnCodec::Numeric, " 2.5 ", None), RawValue::Number(2.5));
  }

  #[test]
  fn test_date_round_trip() {
    assert_eq!(
      round_trip(&ColumnCodec::Date, "2024-01-01", None),
      RawValue::Date("2024-01-01".into())
    );
  }

  #[test]
  fn test_link_round_trip() {
    assert_eq!(
      round_trip(&ColumnCodec::Link, "https://example.com", Some("label")),
      RawValue::Link {
        url: "https://example.com".into(),
        text: Some("label".into())
      }
    );
    // Empty display text is dropped, as it is when read back from storage
    let value = encode(&ColumnCodec::Link, Some("https://example.com"), Some(""))
      .unwrap()
      .unwrap();
    assert_eq!(value.to_payload(), serde_json::json!({"url": "https://example.com"}));
    assert_eq!(
      round_trip(&ColumnCodec::Link, "https://example.com", Some("")),
      RawValue::Link {
        url: "https://example.com".into(),
        text: None
      }
    );
    assert_eq!(
      round_trip(&ColumnCodec::Link, "https://example.com", None),
      RawValue::Link {
        url: "https://example.com".into(),
        text: None
      }
    );
  }

  #[test]
  fn test_status_maps_label_not_index() {
    let codec = status_codec();
    let value = encode(&codec, Some("Done"), None).unwrap().unwrap();
    assert_eq!(
      value,
      ColumnValue::Status {
        index: 1,
        label: "Done".into()
      }
    );
    assert_eq!(decode(&codec, &value).unwrap(), RawValue::Label("Done".into()));
  }

  #[test]
  fn test_status_payload_round_trip() {
    let codec = status_codec();
    let payload = encode(&codec, Some("Done"), None).unwrap().unwrap().to_payload();
    assert_eq!(payload, json!({"index": 1}));
    assert_eq!(decode_payload(&codec, &payload).unwrap(), RawValue::Label("Done".into()));
  }

  #[test]
  fn test_absent_value_is_noop_for_every_type() {
    for codec in [
      ColumnCodec::LongText,
      ColumnCodec::Numeric,
      ColumnCodec::Text,
      ColumnCodec::Name,
      ColumnCodec::Date,
      ColumnCodec::Link,
      status_codec(),
    ] {
      assert!(encode(&codec, None, Some("ignored")).unwrap().is_none());
    }
  }

  #[test]
  fn test_invalid_inputs() {
    assert!(matches!(
      encode(&ColumnCodec::Numeric, Some("eighty"), None),
      Err(DispatchError::InvalidNumber(_))
    ));
    assert!(matches!(
      encode(&ColumnCodec::Date, Some("01/01/2024"), None),
      Err(DispatchError::InvalidDate(_))
    ));
    assert!(matches!(
      encode(&status_codec(), Some("Stuck"), None),
      Err(DispatchError::UnknownLabel(_))
    ));
  }

  #[test]
  fn test_decode_rejects_wrong_variant() {
    let err = decode(&ColumnCodec::Numeric, &ColumnValue::Text("80".into())).unwrap_err();
    assert!(matches!(err, DispatchError::ValueMismatch { .. }));
  }

  #[test]
  fn test_codec_for_column() {
    let mut column = Column {
      id: ColumnId("status".into()),
      title: "Status".into(),
      column_type: "color".into(),
      settings_str: Some(r#"{"labels":{"0":"Working on it","1":"Done"}}"#.into()),
    };
    assert_eq!(ColumnCodec::for_column(&column).unwrap(), status_codec());

    column.settings_str = None;
    assert!(matches!(
      ColumnCodec::for_column(&column),
      Err(DispatchError::MissingSettings)
    ));

    column.column_type = "people".into();
    assert!(matches!(
      ColumnCodec::for_column(&column),
      Err(DispatchError::Unsupported(_))
    ));
  }
}
