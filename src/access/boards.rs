//! Board and column resolution.

use tracing::{debug, error, info, warn};

use super::WorkspaceAccess;
use crate::cache::{CacheSource, Lookup, Unresolved};
use crate::column::{ColumnCodec, ColumnType, StatusLabels};
use crate::monday::api::WorkspaceApi;
use crate::monday::types::{Board, BoardId, Column, ColumnId, User};

impl<A: WorkspaceApi> WorkspaceAccess<A> {
  /// Resolve a board by name, cache-first, without creating it.
  pub(crate) async fn lookup_board(&mut self, name: &str) -> Lookup<Board> {
    let api = &self.api;
    let retrier = &self.retrier;
    let key = name.to_string();

    let (lookup, source) = self
      .caches
      .boards
      .resolve(&key, || async move {
        retrier
          .run("board lookup", || api.board_by_name(name))
          .await
          .into_lookup()
      })
      .await;

    match (&lookup, source) {
      (Ok(board), CacheSource::Cache) => debug!("Board '{}' found in cache (id {})", name, board.id),
      (Ok(board), CacheSource::Remote) => info!("Board '{}' exists with id {}", name, board.id),
      (Err(reason), _) => warn!("Board '{}' not resolved: {}", name, reason),
    }
    lookup
  }

  /// Find or create the board called `name` and return its id.
  ///
  /// An existing board always wins over creating a duplicate. When the
  /// existence check itself cannot complete, nothing is created.
  pub async fn ensure_board(&mut self, name: &str) -> Option<BoardId> {
    match self.lookup_board(name).await {
      Ok(board) => {
        info!(
          "Not making board '{}'; returning id of existing board: {}",
          name, board.id
        );
        Some(board.id)
      }
      Err(Unresolved::Exhausted) => {
        error!(
          "Could not determine whether board '{}' exists; not creating it",
          name
        );
        None
      }
      Err(Unresolved::NotFound) => {
        let api = &self.api;
        let kind = self.board_kind;
        let created = self
          .retrier
          .run("create board", || api.create_board(name, kind))
          .await
          .into_option()?;

        info!("New board '{}' created with id {}", name, created.id);
        let id = created.id;
        self.caches.boards.put_entity(created);
        Some(id)
      }
    }
  }

  /// Whether a board called `name` exists. Lookup failures count as "no".
  pub async fn board_exists(&mut self, name: &str) -> bool {
    self.lookup_board(name).await.is_ok()
  }

  /// Board id straight from the remote service, bypassing the cache.
  pub async fn get_board_id(&self, name: &str) -> Option<BoardId> {
    let lookup = self
      .retrier
      .run("board id lookup", || self.api.board_by_name(name))
      .await
      .into_lookup();

    match lookup {
      Ok(board) => Some(board.id),
      Err(reason) => {
        warn!("No board id for '{}': {}", name, reason);
        None
      }
    }
  }

  /// Every board in the workspace.
  pub async fn list_boards(&self) -> Vec<Board> {
    let boards = self
      .retrier
      .run("list boards", || self.api.boards())
      .await
      .into_option()
      .unwrap_or_default();
    debug!("{} boards found", boards.len());
    boards
  }

  /// Users of the workspace.
  pub async fn list_users(&self) -> Vec<User> {
    self
      .retrier
      .run("list users", || self.api.users())
      .await
      .into_option()
      .unwrap_or_default()
  }

  pub(crate) async fn lookup_columns(&mut self, board: &str) -> Lookup<Vec<Column>> {
    let key = board.to_string();
    if let Some(columns) = self.caches.columns.get(&key) {
      debug!("Column list for board '{}' found in cache", board);
      return Ok(columns);
    }

    debug!("No cached column list for board '{}'", board);
    let board_id = self.lookup_board(board).await?.id;

    let api = &self.api;
    let columns = self
      .retrier
      .run("get columns", || api.columns(board_id))
      .await
      .into_found()?;

    self.caches.columns.put(key, columns.clone());
    Ok(columns)
  }

  /// Columns of a board in display order, cached per board name.
  pub async fn columns_for_board(&mut self, board: &str) -> Vec<Column> {
    self.lookup_columns(board).await.unwrap_or_default()
  }

  pub(crate) async fn column_by_title(&mut self, board: &str, title: &str) -> Lookup<Column> {
    let columns = self.lookup_columns(board).await?;
    columns
      .into_iter()
      .find(|c| c.title == title)
      .ok_or(Unresolved::NotFound)
  }

  pub async fn column_id(&mut self, board: &str, title: &str) -> Option<ColumnId> {
    let column = self.column_by_title(board, title).await.ok()?;
    debug!("Column '{}' has id {}", title, column.id);
    Some(column.id)
  }

  /// Declared type of a column, as the remote service spells it.
  pub async fn column_type(&mut self, board: &str, title: &str) -> Option<String> {
    let column = self.column_by_title(board, title).await.ok()?;
    debug!("Column '{}' has type {}", title, column.column_type);
    Some(column.column_type)
  }

  /// Column as the remote service reports it right now, skipping the cache.
  async fn fresh_column(&mut self, board: &str, title: &str) -> Option<Column> {
    let board_id = self.lookup_board(board).await.ok()?.id;

    let api = &self.api;
    let columns = self
      .retrier
      .run("get column settings", || api.columns(board_id))
      .await
      .into_option()?;

    let column = columns.into_iter().find(|c| c.title == title);
    if column.is_none() {
      warn!("Column '{}' not found on board '{}'", title, board);
    }
    column
  }

  /// Label table of a status column, read fresh from the remote service.
  pub async fn status_labels(&mut self, board: &str, title: &str) -> Option<StatusLabels> {
    let column = self.fresh_column(board, title).await?;
    let Some(settings) = column.settings_str else {
      warn!("Column '{}' on board '{}' has no label settings", title, board);
      return None;
    };

    match StatusLabels::from_settings(&settings) {
      Ok(labels) => Some(labels),
      Err(e) => {
        warn!("Label settings of column '{}' unreadable: {}", title, e);
        None
      }
    }
  }

  /// Codec for a column. Status labels are per-board settings that may have
  /// changed since the column list was cached, so they are read fresh.
  pub(crate) async fn codec_for(&mut self, board: &str, column: &Column) -> Option<ColumnCodec> {
    let fresh;
    let column = if ColumnType::from_api(&column.column_type) == Some(ColumnType::Status) {
      fresh = self.fresh_column(board, &column.title).await?;
      &fresh
    } else {
      column
    };

    match ColumnCodec::for_column(column) {
      Ok(codec) => Some(codec),
      Err(e) => {
        warn!("No codec for column '{}': {}", column.title, e);
        None
      }
    }
  }

  /// Add a long-text column to a board and return its id.
  pub async fn add_column(&mut self, board: &str, title: &str) -> Option<ColumnId> {
    let board_id = self.lookup_board(board).await.ok()?.id;
    info!("Adding column '{}' to board '{}'", title, board);

    let api = &self.api;
    self
      .retrier
      .run("add column", || {
        api.add_column(board_id, title, ColumnType::LongText.api_name())
      })
      .await
      .into_option()?;

    // The cached list no longer matches the board we just changed
    self.caches.columns.remove(&board.to_string());
    self.column_id(board, title).await
  }
}
