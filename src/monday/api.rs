//! Remote workspace collaborator.
//!
//! The access layer never talks to the wire itself. Whatever SDK or HTTP
//! client is in use is wrapped in a `WorkspaceApi` implementation and handed
//! to `WorkspaceAccess` at construction.

use async_trait::async_trait;
use color_eyre::Result;
use serde_json::Value;

use super::types::{Board, BoardId, BoardKind, Column, ColumnId, Group, GroupId, Item, ItemId, User};

/// Remote work-management service.
///
/// Every method is fallible with a generic error. The access layer does not
/// inspect the error; any `Err` counts as a transient remote failure.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
  /// Look up a board by its exact name
  async fn board_by_name(&self, name: &str) -> Result<Option<Board>>;

  async fn create_board(&self, name: &str, kind: BoardKind) -> Result<Board>;

  async fn boards(&self) -> Result<Vec<Board>>;

  /// Columns of a board, in display order
  async fn columns(&self, board: BoardId) -> Result<Vec<Column>>;

  /// Add a column with the given remote type name (e.g. "long-text")
  async fn add_column(&self, board: BoardId, title: &str, column_type: &str) -> Result<Column>;

  async fn items(&self, board: BoardId) -> Result<Vec<Item>>;

  /// Most recently created items across every board
  async fn recent_items(&self, limit: usize) -> Result<Vec<Item>>;

  /// Items of a board whose value in `column` matches `value`.
  ///
  /// The remote match may be looser than equality.
  async fn items_by_column_value(
    &self,
    board: BoardId,
    column: &ColumnId,
    value: &str,
  ) -> Result<Vec<Item>>;

  async fn create_item(&self, board: BoardId, name: &str) -> Result<Item>;

  /// Raw stored payload of one cell, `None` when the cell is empty
  async fn column_value(&self, item: ItemId, column: &ColumnId) -> Result<Option<Value>>;

  async fn change_column_value(&self, item: ItemId, column: &ColumnId, value: Value) -> Result<()>;

  async fn group_by_title(&self, board: BoardId, title: &str) -> Result<Option<Group>>;

  async fn move_item_to_group(&self, item: ItemId, group: &GroupId) -> Result<Item>;

  async fn users(&self) -> Result<Vec<User>>;
}
