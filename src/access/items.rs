//! Item resolution by name.
//!
//! The remote name search is loose (substring, case-insensitive), so every
//! candidate it returns is cached and the first exact match wins.

use tracing::{debug, error, info, warn};

use super::{WorkspaceAccess, RECENT_ITEMS_LIMIT};
use crate::cache::{Lookup, Unresolved};
use crate::monday::api::WorkspaceApi;
use crate::monday::cache::ItemKey;
use crate::monday::types::{Board, Column, ColumnId, Item, ItemId};

impl<A: WorkspaceApi> WorkspaceAccess<A> {
  async fn query_items_named(&self, board: &Board, name: &str) -> Lookup<Vec<Item>> {
    let name_column = ColumnId::name();
    self
      .retrier
      .run("item search", || {
        self.api.items_by_column_value(board.id, &name_column, name)
      })
      .await
      .into_found()
  }

  /// Items of `board` whose name matches `name` as loosely as the remote
  /// search does. Not cached.
  pub async fn list_items_matching_name(&mut self, board: &str, name: &str) -> Vec<Item> {
    let Ok(board) = self.lookup_board(board).await else {
      return Vec::new();
    };

    match self.query_items_named(&board, name).await {
      Ok(items) => items,
      Err(reason) => {
        warn!("Item search for '{}' on board '{}' failed: {}", name, board.name, reason);
        Vec::new()
      }
    }
  }

  pub(crate) async fn lookup_item(&mut self, board: &str, name: &str) -> Lookup<Item> {
    let board = self.lookup_board(board).await?;
    let key = ItemKey::new(board.id, name);

    if let Some(item) = self.caches.items.get(&key) {
      debug!("Item '{}' found in cache (id {})", name, item.id);
      return Ok(item);
    }

    let candidates = self.query_items_named(&board, name).await?;
    debug!("{} candidates for item '{}'", candidates.len(), name);

    let found = candidates.iter().find(|i| i.name == name).cloned();
    for candidate in candidates {
      self.caches.items.put_entity(candidate);
    }

    match found {
      Some(item) => {
        info!("Item '{}' exists with id {}", name, item.id);
        Ok(item)
      }
      None => Err(Unresolved::NotFound),
    }
  }

  /// Item in `board` whose name is exactly `name`.
  pub async fn find_item(&mut self, board: &str, name: &str) -> Option<Item> {
    match self.lookup_item(board, name).await {
      Ok(item) => Some(item),
      Err(reason) => {
        debug!("Item '{}' in board '{}' {}", name, board, reason);
        None
      }
    }
  }

  pub async fn item_exists(&mut self, board: &str, name: &str) -> bool {
    self.lookup_item(board, name).await.is_ok()
  }

  pub async fn item_id(&mut self, board: &str, name: &str) -> Option<ItemId> {
    self.find_item(board, name).await.map(|i| i.id)
  }

  /// Find or create the item called `name` in `board`.
  ///
  /// The created item is read back through the name search before its id
  /// is returned, so the cache only ever holds what the service reports.
  pub async fn ensure_item(&mut self, board: &str, name: &str) -> Option<ItemId> {
    match self.lookup_item(board, name).await {
      Ok(item) => {
        info!("Not making item '{}'; returning existing id {}", name, item.id);
        return Some(item.id);
      }
      Err(Unresolved::Exhausted) => {
        error!(
          "Could not determine whether item '{}' exists in board '{}'; not creating it",
          name, board
        );
        return None;
      }
      Err(Unresolved::NotFound) => {}
    }

    let board_id = self.lookup_board(board).await.ok()?.id;
    let api = &self.api;
    let created = self
      .retrier
      .run("create item", || api.create_item(board_id, name))
      .await
      .into_option()?;
    info!("Item '{}' created with id {}", name, created.id);

    match self.lookup_item(board, name).await {
      Ok(item) => Some(item.id),
      Err(reason) => {
        error!(
          "Item '{}' was created (id {}) but could not be read back: {}",
          name, created.id, reason
        );
        None
      }
    }
  }

  /// Every item on a board, straight from the remote service.
  pub async fn items_in_board(&mut self, board: &str) -> Vec<Item> {
    let Ok(board) = self.lookup_board(board).await else {
      return Vec::new();
    };

    let api = &self.api;
    self
      .retrier
      .run("list items", || api.items(board.id))
      .await
      .into_option()
      .unwrap_or_default()
  }

  /// Most recently created items across the workspace.
  pub async fn recent_items(&self) -> Vec<Item> {
    self
      .retrier
      .run("recent items", || self.api.recent_items(RECENT_ITEMS_LIMIT))
      .await
      .into_option()
      .unwrap_or_default()
  }

  /// Columns of the board an existing item lives on.
  pub async fn columns_for_item(&mut self, board: &str, item_name: &str) -> Vec<Column> {
    if !self.item_exists(board, item_name).await {
      return Vec::new();
    }
    self.columns_for_board(board).await
  }
}
