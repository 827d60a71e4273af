//! Item creation, column writes and reads, group moves.

use tracing::{debug, error, info, warn};

use super::WorkspaceAccess;
use crate::cache::Cacheable;
use crate::column::{decode_payload, encode, ColumnCodec, RawValue};
use crate::monday::api::WorkspaceApi;
use crate::monday::types::{Column, Item, ItemId};

impl<A: WorkspaceApi> WorkspaceAccess<A> {
  /// Add an item to a board unless one with the same name already exists.
  pub async fn add_item(&mut self, board: &str, name: &str) -> Option<ItemId> {
    self.ensure_item(board, name).await
  }

  async fn resolve_cell(&mut self, board: &str, item_name: &str, column_title: &str) -> Option<(Item, Column)> {
    let item = match self.lookup_item(board, item_name).await {
      Ok(item) => item,
      Err(reason) => {
        warn!("Item '{}' in board '{}' unresolved: {}", item_name, board, reason);
        return None;
      }
    };

    match self.column_by_title(board, column_title).await {
      Ok(column) => Some((item, column)),
      Err(reason) => {
        warn!("Column '{}' in board '{}' unresolved: {}", column_title, board, reason);
        None
      }
    }
  }

  /// Write `raw` into a column of an item and return the value written.
  ///
  /// An absent `raw` is a no-op and touches nothing remote. `link_text` is
  /// only used by link columns. Unknown items or columns, unsupported column
  /// types, unparsable values and exhausted retries all yield `None`.
  pub async fn set_column_value(
    &mut self,
    board: &str,
    item_name: &str,
    column_title: &str,
    raw: Option<&str>,
    link_text: Option<&str>,
  ) -> Option<String> {
    let Some(raw) = raw else {
      debug!("No value for column '{}' of '{}'; nothing to change", column_title, item_name);
      return None;
    };

    let (item, column) = self.resolve_cell(board, item_name, column_title).await?;
    let codec = self.codec_for(board, &column).await?;

    let value = match encode(&codec, Some(raw), link_text) {
      Ok(value) => value?,
      Err(e) => {
        warn!("Value '{}' rejected for column '{}': {}", raw, column_title, e);
        return None;
      }
    };
    let payload = value.to_payload();

    let api = &self.api;
    let outcome = self
      .retrier
      .run("change column value", || {
        api.change_column_value(item.id, &column.id, payload.clone())
      })
      .await;
    if outcome.is_exhausted() {
      error!(
        "Column '{}' of item '{}' was not changed after {} attempts",
        column_title,
        item_name,
        outcome.attempts()
      );
      return None;
    }

    // A name write renames the item; its old cache entry is stale
    if matches!(codec, ColumnCodec::Name) {
      self.caches.items.remove(&item.cache_key());
    }

    info!(
      "Value of column '{}' for item '{}' changed to {}",
      column_title, item_name, payload
    );
    Some(raw.to_string())
  }

  /// Current value of a column of an item. Empty cells yield `None`.
  pub async fn column_value(
    &mut self,
    board: &str,
    item_name: &str,
    column_title: &str,
  ) -> Option<RawValue> {
    let (item, column) = self.resolve_cell(board, item_name, column_title).await?;
    let codec = self.codec_for(board, &column).await?;

    let api = &self.api;
    let payload = self
      .retrier
      .run("read column value", || api.column_value(item.id, &column.id))
      .await
      .into_option()?;

    let Some(payload) = payload else {
      debug!("Column '{}' of item '{}' is empty", column_title, item_name);
      return None;
    };

    match decode_payload(&codec, &payload) {
      Ok(value) => Some(value),
      Err(e) => {
        warn!("Stored value of column '{}' unreadable: {}", column_title, e);
        None
      }
    }
  }

  /// Status label of an item, rendered as text.
  pub async fn item_status(
    &mut self,
    board: &str,
    item_name: &str,
    column_title: &str,
  ) -> Option<String> {
    self
      .column_value(board, item_name, column_title)
      .await
      .map(|value| value.to_string())
  }

  /// Move an item into the group titled `group_title`.
  pub async fn move_item_to_group(
    &mut self,
    board: &str,
    item_name: &str,
    group_title: &str,
  ) -> Option<Item> {
    let item = self.lookup_item(board, item_name).await.ok()?;
    let board_id = item.board_id;

    let api = &self.api;
    let group = self
      .retrier
      .run("group lookup", || api.group_by_title(board_id, group_title))
      .await
      .into_lookup();
    let group = match group {
      Ok(group) => group,
      Err(reason) => {
        warn!("Group '{}' in board '{}' unresolved: {}", group_title, board, reason);
        return None;
      }
    };

    let moved = self
      .retrier
      .run("move item", || api.move_item_to_group(item.id, &group.id))
      .await
      .into_option()?;

    info!("Item '{}' moved to group '{}'", item_name, group_title);
    self.caches.items.put_entity(moved.clone());
    Some(moved)
  }
}
