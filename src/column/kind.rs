/// Declared column types the dispatcher knows how to encode and decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
  LongText,
  Numeric,
  Text,
  Name,
  Date,
  Link,
  /// Label-indexed status column ("color" on the wire)
  Status,
}

impl ColumnType {
  pub const ALL: [ColumnType; 7] = [
    ColumnType::LongText,
    ColumnType::Numeric,
    ColumnType::Text,
    ColumnType::Name,
    ColumnType::Date,
    ColumnType::Link,
    ColumnType::Status,
  ];

  /// Map the remote service's type name. Unknown names yield `None`.
  pub fn from_api(name: &str) -> Option<Self> {
    match name {
      "long-text" | "long_text" => Some(ColumnType::LongText),
      "numeric" | "numbers" => Some(ColumnType::Numeric),
      "text" => Some(ColumnType::Text),
      "name" => Some(ColumnType::Name),
      "date" => Some(ColumnType::Date),
      "link" => Some(ColumnType::Link),
      "color" | "status" => Some(ColumnType::Status),
      _ => None,
    }
  }

  /// Type name as the remote service reports it
  pub fn api_name(self) -> &'static str {
    match self {
      ColumnType::LongText => "long-text",
      ColumnType::Numeric => "numeric",
      ColumnType::Text => "text",
      ColumnType::Name => "name",
      ColumnType::Date => "date",
      ColumnType::Link => "link",
      ColumnType::Status => "color",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_names_map_back() {
    for column_type in ColumnType::ALL {
      assert_eq!(ColumnType::from_api(column_type.api_name()), Some(column_type));
    }
  }

  #[test]
  fn test_aliases() {
    assert_eq!(ColumnType::from_api("status"), Some(ColumnType::Status));
    assert_eq!(ColumnType::from_api("numbers"), Some(ColumnType::Numeric));
    assert_eq!(ColumnType::from_api("long_text"), Some(ColumnType::LongText));
  }

  #[test]
  fn test_unknown_type() {
    assert_eq!(ColumnType::from_api("people"), None);
    assert_eq!(ColumnType::from_api(""), None);
  }
}
