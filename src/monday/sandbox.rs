//! In-memory workspace.
//!
//! `SandboxWorkspace` implements `WorkspaceApi` without any network access.
//! Its state can be loaded from and saved to a YAML fixture, which is what the
//! CLI runs against. Every call is counted per operation and failures can be
//! injected per operation, so tests can observe exactly which remote calls
//! the access layer makes.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::api::WorkspaceApi;
use super::types::{Board, BoardId, BoardKind, Column, ColumnId, Group, GroupId, Item, ItemId, User};

/// Title of the group every new board starts with
pub const DEFAULT_GROUP_TITLE: &str = "Group Title";

// ============================================================================
// Persistent state
// ============================================================================

/// Serializable workspace contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxState {
  /// Next id handed out to a created board or item
  #[serde(default = "first_id")]
  pub next_id: u64,
  #[serde(default)]
  pub boards: Vec<SandboxBoard>,
  #[serde(default)]
  pub users: Vec<User>,
}

fn first_id() -> u64 {
  1
}

impl Default for SandboxState {
  fn default() -> Self {
    Self {
      next_id: first_id(),
      boards: Vec::new(),
      users: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxBoard {
  pub id: BoardId,
  pub name: String,
  #[serde(default)]
  pub kind: BoardKind,
  #[serde(default)]
  pub columns: Vec<Column>,
  #[serde(default)]
  pub groups: Vec<Group>,
  #[serde(default)]
  pub items: Vec<SandboxItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxItem {
  pub id: ItemId,
  pub name: String,
  #[serde(default)]
  pub group_id: Option<GroupId>,
  /// Column id -> stored payload
  #[serde(default)]
  pub values: BTreeMap<String, Value>,
}

impl SandboxBoard {
  fn summary(&self) -> Board {
    Board {
      id: self.id,
      name: self.name.clone(),
      kind: self.kind,
    }
  }

  fn item(&self, item: &SandboxItem) -> Item {
    Item {
      id: item.id,
      name: item.name.clone(),
      board_id: self.id,
      group_id: item.group_id.clone(),
    }
  }
}

impl SandboxState {
  fn allocate_id(&mut self) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  /// Create a board the way the remote service does: with a name column and
  /// one default group.
  pub fn add_board(&mut self, name: &str, kind: BoardKind) -> BoardId {
    let id = BoardId(self.allocate_id());
    self.boards.push(SandboxBoard {
      id,
      name: name.to_string(),
      kind,
      columns: vec![Column {
        id: ColumnId::name(),
        title: "Name".to_string(),
        column_type: "name".to_string(),
        settings_str: None,
      }],
      groups: vec![Group {
        id: GroupId("topics".to_string()),
        title: DEFAULT_GROUP_TITLE.to_string(),
      }],
      items: Vec::new(),
    });
    id
  }

  pub fn add_column(&mut self, board: BoardId, column: Column) -> Result<()> {
    let board = self.board_mut(board)?;
    if board.columns.iter().any(|c| c.id == column.id) {
      return Err(eyre!("Column {} already exists on board {}", column.id, board.id));
    }
    board.columns.push(column);
    Ok(())
  }

  pub fn add_group(&mut self, board: BoardId, id: &str, title: &str) -> Result<()> {
    self.board_mut(board)?.groups.push(Group {
      id: GroupId(id.to_string()),
      title: title.to_string(),
    });
    Ok(())
  }

  /// Add an item to the board's first group.
  pub fn add_item(&mut self, board: BoardId, name: &str) -> Result<ItemId> {
    // Fail before allocating so a missing board does not burn an id
    self.board_mut(board)?;
    let id = ItemId(self.allocate_id());
    let board = self.board_mut(board)?;
    let group_id = board.groups.first().map(|g| g.id.clone());
    board.items.push(SandboxItem {
      id,
      name: name.to_string(),
      group_id,
      values: BTreeMap::new(),
    });
    Ok(id)
  }

  pub fn set_value(&mut self, item: ItemId, column: &ColumnId, value: Value) -> Result<()> {
    let (b, i) = self.locate(item)?;
    let board = &mut self.boards[b];

    if !board.columns.iter().any(|c| &c.id == column) {
      return Err(eyre!("Column {} does not exist on board {}", column, board.id));
    }

    let entry = &mut board.items[i];
    if *column == ColumnId::name() {
      let name = value
        .as_str()
        .ok_or_else(|| eyre!("Item name must be a string, got {}", value))?;
      entry.name = name.to_string();
    } else {
      entry.values.insert(column.0.clone(), value);
    }
    Ok(())
  }

  fn board(&self, id: BoardId) -> Result<&SandboxBoard> {
    self
      .boards
      .iter()
      .find(|b| b.id == id)
      .ok_or_else(|| eyre!("Board {} not found", id))
  }

  fn board_mut(&mut self, id: BoardId) -> Result<&mut SandboxBoard> {
    self
      .boards
      .iter_mut()
      .find(|b| b.id == id)
      .ok_or_else(|| eyre!("Board {} not found", id))
  }

  /// Board and item index of an item
  fn locate(&self, item: ItemId) -> Result<(usize, usize)> {
    self
      .boards
      .iter()
      .enumerate()
      .find_map(|(b, board)| {
        board
          .items
          .iter()
          .position(|i| i.id == item)
          .map(|i| (b, i))
      })
      .ok_or_else(|| eyre!("Item {} not found", item))
  }
}

// ============================================================================
// Workspace
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Failure {
  Next(u32),
  Always,
}

/// In-memory `WorkspaceApi` with call counting and failure injection.
#[derive(Debug, Default)]
pub struct SandboxWorkspace {
  state: Mutex<SandboxState>,
  calls: Mutex<HashMap<String, u32>>,
  failures: Mutex<HashMap<String, Failure>>,
}

impl SandboxWorkspace {
  pub fn new(state: SandboxState) -> Self {
    Self {
      state: Mutex::new(state),
      calls: Mutex::new(HashMap::new()),
      failures: Mutex::new(HashMap::new()),
    }
  }

  /// Load a workspace fixture from YAML.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read workspace fixture {}: {}", path.display(), e))?;

    let state: SandboxState = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse workspace fixture {}: {}", path.display(), e))?;

    Ok(Self::new(state))
  }

  /// Write the current workspace state back to a YAML fixture.
  pub fn save(&self, path: &Path) -> Result<()> {
    let contents = serde_yaml::to_string(&self.snapshot()?)
      .map_err(|e| eyre!("Failed to serialize workspace: {}", e))?;

    std::fs::write(path, contents)
      .map_err(|e| eyre!("Failed to write workspace fixture {}: {}", path.display(), e))?;

    Ok(())
  }

  pub fn snapshot(&self) -> Result<SandboxState> {
    Ok(self.state()?.clone())
  }

  /// Number of calls made to one `WorkspaceApi` operation
  pub fn calls(&self, operation: &str) -> u32 {
    self
      .calls
      .lock()
      .map(|calls| calls.get(operation).copied().unwrap_or(0))
      .unwrap_or(0)
  }

  /// Number of calls made to any operation
  pub fn total_calls(&self) -> u32 {
    self
      .calls
      .lock()
      .map(|calls| calls.values().sum())
      .unwrap_or(0)
  }

  pub fn reset_calls(&self) {
    if let Ok(mut calls) = self.calls.lock() {
      calls.clear();
    }
  }

  /// Make the next `count` calls to `operation` fail.
  pub fn fail_next(&self, operation: &str, count: u32) {
    if let Ok(mut failures) = self.failures.lock() {
      failures.insert(operation.to_string(), Failure::Next(count));
    }
  }

  /// Make every call to `operation` fail.
  pub fn fail_always(&self, operation: &str) {
    if let Ok(mut failures) = self.failures.lock() {
      failures.insert(operation.to_string(), Failure::Always);
    }
  }

  fn state(&self) -> Result<MutexGuard<'_, SandboxState>> {
    self
      .state
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  /// Record a call and apply any injected failure.
  fn enter(&self, operation: &str) -> Result<()> {
    {
      let mut calls = self
        .calls
        .lock()
        .map_err(|e| eyre!("Lock poisoned: {}", e))?;
      *calls.entry(operation.to_string()).or_insert(0) += 1;
    }

    let mut failures = self
      .failures
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    match failures.get(operation).copied() {
      Some(Failure::Always) => Err(eyre!("{}: complexity budget exhausted", operation)),
      Some(Failure::Next(remaining)) if remaining > 0 => {
        failures.insert(operation.to_string(), Failure::Next(remaining - 1));
        Err(eyre!("{}: complexity budget exhausted", operation))
      }
      _ => Ok(()),
    }
  }
}

/// Column id derived from a title, unique within `columns`
fn column_id_for(title: &str, columns: &[Column]) -> ColumnId {
  let base: String = title
    .to_lowercase()
    .chars()
    .map(|c| if c.is_alphanumeric() { c } else { '_' })
    .collect();

  let mut candidate = base.clone();
  let mut suffix = 1;
  while columns.iter().any(|c| c.id.0 == candidate) {
    candidate = format!("{}{}", base, suffix);
    suffix += 1;
  }
  ColumnId(candidate)
}

#[async_trait]
impl WorkspaceApi for SandboxWorkspace {
  async fn board_by_name(&self, name: &str) -> Result<Option<Board>> {
    self.enter("board_by_name")?;
    let state = self.state()?;
    Ok(
      state
        .boards
        .iter()
        .find(|b| b.name == name)
        .map(SandboxBoard::summary),
    )
  }

  async fn create_board(&self, name: &str, kind: BoardKind) -> Result<Board> {
    self.enter("create_board")?;
    let mut state = self.state()?;
    let id = state.add_board(name, kind);
    Ok(state.board(id)?.summary())
  }

  async fn boards(&self) -> Result<Vec<Board>> {
    self.enter("boards")?;
    let state = self.state()?;
    Ok(state.boards.iter().map(SandboxBoard::summary).collect())
  }

  async fn columns(&self, board: BoardId) -> Result<Vec<Column>> {
    self.enter("columns")?;
    let state = self.state()?;
    Ok(state.board(board)?.columns.clone())
  }

  async fn add_column(&self, board: BoardId, title: &str, column_type: &str) -> Result<Column> {
    self.enter("add_column")?;
    let mut state = self.state()?;
    let column = Column {
      id: column_id_for(title, &state.board(board)?.columns),
      title: title.to_string(),
      column_type: column_type.to_string(),
      settings_str: None,
    };
    state.add_column(board, column.clone())?;
    Ok(column)
  }

  async fn items(&self, board: BoardId) -> Result<Vec<Item>> {
    self.enter("items")?;
    let state = self.state()?;
    let board = state.board(board)?;
    Ok(board.items.iter().map(|i| board.item(i)).collect())
  }

  async fn recent_items(&self, limit: usize) -> Result<Vec<Item>> {
    self.enter("recent_items")?;
    let state = self.state()?;
    let mut items: Vec<Item> = state
      .boards
      .iter()
      .flat_map(|b| b.items.iter().map(move |i| b.item(i)))
      .collect();
    items.sort_by(|a, b| b.id.cmp(&a.id));
    items.truncate(limit);
    Ok(items)
  }

  async fn items_by_column_value(
    &self,
    board: BoardId,
    column: &ColumnId,
    value: &str,
  ) -> Result<Vec<Item>> {
    self.enter("items_by_column_value")?;
    let state = self.state()?;
    let board = state.board(board)?;
    let needle = value.to_lowercase();

    // Loose matching, like the real search: callers filter for exact matches
    let matches = |item: &SandboxItem| -> bool {
      if *column == ColumnId::name() {
        return item.name.to_lowercase().contains(&needle);
      }
      match item.values.get(&column.0) {
        Some(Value::String(s)) => s.to_lowercase().contains(&needle),
        Some(other) => other.to_string().to_lowercase().contains(&needle),
        None => false,
      }
    };

    Ok(
      board
        .items
        .iter()
        .filter(|i| matches(*i))
        .map(|i| board.item(i))
        .collect(),
    )
  }

  async fn create_item(&self, board: BoardId, name: &str) -> Result<Item> {
    self.enter("create_item")?;
    let mut state = self.state()?;
    let id = state.add_item(board, name)?;
    let (b, i) = state.locate(id)?;
    Ok(state.boards[b].item(&state.boards[b].items[i]))
  }

  async fn column_value(&self, item: ItemId, column: &ColumnId) -> Result<Option<Value>> {
    self.enter("column_value")?;
    let state = self.state()?;
    let (b, i) = state.locate(item)?;
    let entry = &state.boards[b].items[i];

    if *column == ColumnId::name() {
      return Ok(Some(Value::String(entry.name.clone())));
    }
    Ok(entry.values.get(&column.0).cloned())
  }

  async fn change_column_value(&self, item: ItemId, column: &ColumnId, value: Value) -> Result<()> {
    self.enter("change_column_value")?;
    self.state()?.set_value(item, column, value)
  }

  async fn group_by_title(&self, board: BoardId, title: &str) -> Result<Option<Group>> {
    self.enter("group_by_title")?;
    let state = self.state()?;
    Ok(
      state
        .board(board)?
        .groups
        .iter()
        .find(|g| g.title == title)
        .cloned(),
    )
  }

  async fn move_item_to_group(&self, item: ItemId, group: &GroupId) -> Result<Item> {
    self.enter("move_item_to_group")?;
    let mut state = self.state()?;
    let (b, i) = state.locate(item)?;
    let board = &mut state.boards[b];

    if !board.groups.iter().any(|g| &g.id == group) {
      return Err(eyre!("Group {} does not exist on board {}", group, board.id));
    }
    board.items[i].group_id = Some(group.clone());
    Ok(board.item(&board.items[i]))
  }

  async fn users(&self) -> Result<Vec<User>> {
    self.enter("users")?;
    Ok(self.state()?.users.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn test_create_board_adds_name_column_and_group() {
    let sandbox = SandboxWorkspace::default();
    let board = sandbox.create_board("Demo", BoardKind::Public).await.unwrap();

    let columns = sandbox.columns(board.id).await.unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].id, ColumnId::name());

    let group = sandbox
      .group_by_title(board.id, DEFAULT_GROUP_TITLE)
      .await
      .unwrap();
    assert!(group.is_some());
    assert_eq!(sandbox.calls("create_board"), 1);
    assert_eq!(sandbox.total_calls(), 3);
  }

  #[tokio::test]
  async fn test_name_search_is_loose() {
    let mut state = SandboxState::default();
    let board = state.add_board("Demo", BoardKind::Public);
    state.add_item(board, "Set up project").unwrap();
    state.add_item(board, "Set up project docs").unwrap();
    state.add_item(board, "Unrelated").unwrap();
    let sandbox = SandboxWorkspace::new(state);

    let found = sandbox
      .items_by_column_value(board, &ColumnId::name(), "set up project")
      .await
      .unwrap();
    assert_eq!(found.len(), 2);
  }

  #[tokio::test]
  async fn test_failure_injection() {
    let sandbox = SandboxWorkspace::default();
    sandbox.fail_next("boards", 2);

    assert!(sandbox.boards().await.is_err());
    assert!(sandbox.boards().await.is_err());
    assert!(sandbox.boards().await.is_ok());
    assert_eq!(sandbox.calls("boards"), 3);

    sandbox.fail_always("users");
    for _ in 0..5 {
      assert!(sandbox.users().await.is_err());
    }
    assert_eq!(sandbox.calls("users"), 5);
  }

  #[tokio::test]
  async fn test_name_column_write_renames_item() {
    let mut state = SandboxState::default();
    let board = state.add_board("Demo", BoardKind::Public);
    let item = state.add_item(board, "Old").unwrap();
    let sandbox = SandboxWorkspace::new(state);

    sandbox
      .change_column_value(item, &ColumnId::name(), json!("New"))
      .await
      .unwrap();
    let name = sandbox.column_value(item, &ColumnId::name()).await.unwrap();
    assert_eq!(name, Some(json!("New")));
  }

  #[tokio::test]
  async fn test_unknown_column_rejected() {
    let mut state = SandboxState::default();
    let board = state.add_board("Demo", BoardKind::Public);
    let item = state.add_item(board, "Task").unwrap();
    let sandbox = SandboxWorkspace::new(state);

    let result = sandbox
      .change_column_value(item, &ColumnId("missing".into()), json!("x"))
      .await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_add_column_ids_are_unique() {
    let mut state = SandboxState::default();
    let board = state.add_board("Demo", BoardKind::Public);
    let sandbox = SandboxWorkspace::new(state);

    let first = sandbox.add_column(board, "Notes", "long-text").await.unwrap();
    let second = sandbox.add_column(board, "Notes", "long-text").await.unwrap();
    assert_eq!(first.id, ColumnId("notes".into()));
    assert_eq!(second.id, ColumnId("notes1".into()));
  }

  #[tokio::test]
  async fn test_recent_items_newest_first() {
    let mut state = SandboxState::default();
    let a = state.add_board("A", BoardKind::Public);
    let b = state.add_board("B", BoardKind::Private);
    state.add_item(a, "first").unwrap();
    state.add_item(b, "second").unwrap();
    state.add_item(a, "third").unwrap();
    let sandbox = SandboxWorkspace::new(state);

    let recent = sandbox.recent_items(2).await.unwrap();
    let names: Vec<_> = recent.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second"]);
  }

  #[test]
  fn test_fixture_yaml_round_trip() {
    let yaml = r#"
next_id: 100
boards:
  - id: 7
    name: Demo
    columns:
      - id: status
        title: Status
        type: color
        settings_str: '{"labels":{"0":"Working on it","1":"Done"}}'
    items:
      - id: 8
        name: Set up project
        values:
          status: {"index": 0}
users:
  - id: 1
    name: Ada
    email: ada@example.com
"#;
    let state: SandboxState = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(state.next_id, 100);
    assert_eq!(state.boards[0].kind, BoardKind::Public);
    assert_eq!(state.boards[0].items[0].values["status"], json!({"index": 0}));
    assert!(!state.users[0].is_guest);

    let dumped = serde_yaml::to_string(&state).unwrap();
    let reparsed: SandboxState = serde_yaml::from_str(&dumped).unwrap();
    assert_eq!(reparsed.boards[0].columns[0].settings_str, state.boards[0].columns[0].settings_str);
  }
}
