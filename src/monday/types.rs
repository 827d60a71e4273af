use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque board identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(pub u64);

/// Opaque item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

/// Column identifier. Stable, and distinct from the column's display title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(pub String);

/// Group identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for BoardId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for ColumnId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl fmt::Display for GroupId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl ColumnId {
  /// The built-in column holding every item's name
  pub fn name() -> Self {
    ColumnId("name".to_string())
  }
}

/// Board visibility used when creating a board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
  #[default]
  Public,
  Private,
  Share,
}

/// Board summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
  pub id: BoardId,
  pub name: String,
  #[serde(default)]
  pub kind: BoardKind,
}

/// Column definition as reported by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
  pub id: ColumnId,
  pub title: String,
  /// Declared type as the remote service spells it (e.g. "color", "long-text")
  #[serde(rename = "type")]
  pub column_type: String,
  /// Raw settings JSON; carries the label table for status columns
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub settings_str: Option<String>,
}

/// Named subdivision of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
  pub id: GroupId,
  pub title: String,
}

/// Unit of work inside a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
  pub id: ItemId,
  pub name: String,
  pub board_id: BoardId,
  pub group_id: Option<GroupId>,
}

/// Workspace user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: UserId,
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub is_guest: bool,
}

impl User {
  pub fn user_type(&self) -> &'static str {
    if self.is_guest {
      "Guest"
    } else {
      "Team Member"
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ids_display_as_bare_values() {
    assert_eq!(BoardId(42).to_string(), "42");
    assert_eq!(ItemId(7).to_string(), "7");
    assert_eq!(UserId(10).to_string(), "10");
    assert_eq!(ColumnId::name().to_string(), "name");
  }
}
