//! Caching for workspace entities.

use crate::cache::{Cacheable, EntityCache};

use super::types::{Board, BoardId, Column, Item};

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for Board {
  type Key = String;

  fn cache_key(&self) -> String {
    self.name.clone()
  }
}

impl Cacheable for Item {
  type Key = ItemKey;

  fn cache_key(&self) -> ItemKey {
    ItemKey::new(self.board_id, &self.name)
  }
}

// ============================================================================
// Keys
// ============================================================================

/// Item cache key.
///
/// Items are keyed by owning board as well as name, so same-named items in
/// different boards do not overwrite each other. Within one board, names are
/// still not unique and the last item seen under a name wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
  pub board_id: BoardId,
  pub name: String,
}

impl ItemKey {
  pub fn new(board_id: BoardId, name: &str) -> Self {
    Self {
      board_id,
      name: name.to_string(),
    }
  }
}

/// The three independent caches owned by one access layer instance.
#[derive(Debug, Clone)]
pub struct WorkspaceCaches {
  /// Board name -> board
  pub boards: EntityCache<String, Board>,
  /// Board name -> columns in display order
  pub columns: EntityCache<String, Vec<Column>>,
  /// (board, item name) -> item
  pub items: EntityCache<ItemKey, Item>,
}

impl Default for WorkspaceCaches {
  fn default() -> Self {
    Self {
      boards: EntityCache::new("board"),
      columns: EntityCache::new("column list"),
      items: EntityCache::new("item"),
    }
  }
}
