//! Resilient, caching access to a remote workspace.
//!
//! `WorkspaceAccess` resolves boards, items and columns by their
//! human-readable names, caches what it resolves for its own lifetime, and
//! runs every remote call under a bounded retry budget.
//!
//! No public operation returns an error. A missing entity, an unsupported
//! input and an exhausted retry budget all come back as `None` or an empty
//! `Vec`; the reason is only logged.

mod boards;
mod items;
mod mutations;

use crate::config::Config;
use crate::monday::api::WorkspaceApi;
use crate::monday::cache::WorkspaceCaches;
use crate::monday::types::BoardKind;
use crate::retry::{Retrier, RetryPolicy};

/// Number of items `recent_items` asks for
pub const RECENT_ITEMS_LIMIT: usize = 50;

/// Access layer over one `WorkspaceApi` collaborator.
///
/// Operations take `&mut self`: caches are unsynchronized, and one instance
/// serves one caller at a time. Separate instances share nothing.
pub struct WorkspaceAccess<A: WorkspaceApi> {
  api: A,
  retrier: Retrier,
  caches: WorkspaceCaches,
  board_kind: BoardKind,
}

impl<A: WorkspaceApi> WorkspaceAccess<A> {
  pub fn new(api: A, retry: RetryPolicy) -> Self {
    Self {
      api,
      retrier: Retrier::new(retry),
      caches: WorkspaceCaches::default(),
      board_kind: BoardKind::default(),
    }
  }

  pub fn from_config(api: A, config: &Config) -> Self {
    Self::new(api, config.retry).with_board_kind(config.board_kind)
  }

  /// Visibility used for boards created by `ensure_board`.
  pub fn with_board_kind(mut self, board_kind: BoardKind) -> Self {
    self.board_kind = board_kind;
    self
  }

  pub fn api(&self) -> &A {
    &self.api
  }

  pub fn caches(&self) -> &WorkspaceCaches {
    &self.caches
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use super::*;
  use crate::monday::sandbox::{SandboxState, SandboxWorkspace};
  use crate::monday::types::{BoardId, Column, ColumnId, ItemId};
  use serde_json::json;

  pub const STATUS_SETTINGS: &str = r#"{"labels":{"0":"Working on it","1":"Done"}}"#;

  pub struct Fixture {
    pub board: BoardId,
    pub item: ItemId,
    pub access: WorkspaceAccess<SandboxWorkspace>,
  }

  /// Board "Demo" holding "Set up project" with one column of every type
  pub fn demo() -> Fixture {
    let mut state = SandboxState::default();
    let board = state.add_board("Demo", BoardKind::Public);

    let columns = [
      ("status", "Status", "color", Some(STATUS_SETTINGS)),
      ("notes", "Notes", "long-text", None),
      ("task_weight", "Task Weight", "numeric", None),
      ("text", "Text", "text", None),
      ("due", "Due", "date", None),
      ("link", "Link", "link", None),
      ("owner", "Owner", "people", None),
    ];
    for (id, title, column_type, settings) in columns {
      state
        .add_column(
          board,
          Column {
            id: ColumnId(id.to_string()),
            title: title.to_string(),
            column_type: column_type.to_string(),
            settings_str: settings.map(String::from),
          },
        )
        .unwrap();
    }
    state.add_group(board, "done", "Done").unwrap();

    let item = state.add_item(board, "Set up project").unwrap();
    state
      .set_value(item, &ColumnId("status".into()), json!({"index": 0}))
      .unwrap();

    Fixture {
      board,
      item,
      access: WorkspaceAccess::new(SandboxWorkspace::new(state), RetryPolicy::immediate(30)),
    }
  }
}
