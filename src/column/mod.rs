//! Column type dispatch.
//!
//! A column's declared type decides how a caller's raw string becomes a
//! `ColumnValue` payload and how a stored payload is read back. Status columns
//! carry their board-specific label table inside the codec, so every arm of
//! `encode`/`decode` has what it needs without further lookups.

mod dispatch;
mod kind;
mod status;
mod value;

pub use dispatch::{decode, decode_payload, encode};
pub use kind::ColumnType;
pub use status::StatusLabels;
pub use value::{ColumnValue, RawValue};

/// Calendar date format used by date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column type together with the configuration needed to encode/decode it.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnCodec {
  LongText,
  Numeric,
  Text,
  Name,
  Date,
  Link,
  Status(StatusLabels),
}

impl ColumnCodec {
  /// Codec for a type that needs no per-board configuration.
  ///
  /// Status columns need their label table; use `ColumnCodec::Status`.
  pub fn plain(column_type: ColumnType) -> Option<Self> {
    match column_type {
      ColumnType::LongText => Some(ColumnCodec::LongText),
      ColumnType::Numeric => Some(ColumnCodec::Numeric),
      ColumnType::Text => Some(ColumnCodec::Text),
      ColumnType::Name => Some(ColumnCodec::Name),
      ColumnType::Date => Some(ColumnCodec::Date),
      ColumnType::Link => Some(ColumnCodec::Link),
      ColumnType::Status => None,
    }
  }

  pub fn column_type(&self) -> ColumnType {
    match self {
      ColumnCodec::LongText => ColumnType::LongText,
      ColumnCodec::Numeric => ColumnType::Numeric,
      ColumnCodec::Text => ColumnType::Text,
      ColumnCodec::Name => ColumnType::Name,
      ColumnCodec::Date => ColumnType::Date,
      ColumnCodec::Link => ColumnType::Link,
      ColumnCodec::Status(_) => ColumnType::Status,
    }
  }
}

/// Reasons a value cannot be encoded or decoded for its column
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
  #[error("unsupported column type '{0}'")]
  Unsupported(String),
  #[error("'{0}' is not a number")]
  InvalidNumber(String),
  #[error("'{0}' is not a YYYY-MM-DD date")]
  InvalidDate(String),
  #[error("status label '{0}' is not configured for this column")]
  UnknownLabel(String),
  #[error("status index {0} is not configured for this column")]
  UnknownIndex(u32),
  #[error("status label index '{0}' is not numeric")]
  InvalidLabelIndex(String),
  #[error("malformed column settings: {0}")]
  InvalidSettings(#[from] serde_json::Error),
  #[error("status column has no label settings")]
  MissingSettings,
  #[error("{column_type} column cannot hold payload {payload}")]
  PayloadMismatch {
    column_type: &'static str,
    payload: String,
  },
  #[error("{column_type} column cannot hold a {value} value")]
  ValueMismatch {
    column_type: &'static str,
    value: &'static str,
  },
}
