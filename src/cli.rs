//! Command-line front end.

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

use crate::access::WorkspaceAccess;
use crate::monday::api::WorkspaceApi;

/// Item the smoke run works on
const SMOKE_ITEM: &str = "Set up project";

#[derive(Parser, Debug)]
#[command(name = "mwrap")]
#[command(about = "Name-based access to a work-management workspace")]
#[command(version)]
pub struct Args {
  /// Workspace fixture (YAML) to run against
  #[arg(long)]
  pub fixture: PathBuf,

  /// Path to config file (default: ./mwrap.yaml, then $XDG_CONFIG_HOME/mwrap/config.yaml)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Board to work on (default: `default_board` from config)
  #[arg(short, long)]
  pub board: Option<String>,

  /// Leave the fixture file untouched
  #[arg(long)]
  pub dry_run: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Find or create the board
  EnsureBoard,
  /// Add an item unless one with that name exists
  AddItem { name: String },
  /// Write a value into a column of an item
  Set {
    item: String,
    column: String,
    value: String,
    /// Display text for link columns
    #[arg(long)]
    link_text: Option<String>,
  },
  /// Read a column of an item
  Get { item: String, column: String },
  /// Move an item into another group
  Move { item: String, group: String },
  /// List every board
  Boards,
  /// List items of the board
  Items {
    /// Most recent items across the workspace instead
    #[arg(long)]
    recent: bool,
  },
  /// List workspace users
  Users,
  /// Run the end-to-end check against the board
  Smoke,
}

fn require_board(board: Option<&str>) -> Result<&str> {
  board.ok_or_else(|| eyre!("No board given: pass --board or set default_board in the config"))
}

/// Run one command and print its result to stdout.
pub async fn run<A: WorkspaceApi>(
  access: &mut WorkspaceAccess<A>,
  board: Option<&str>,
  command: Command,
) -> Result<()> {
  match command {
    Command::EnsureBoard => {
      let board = require_board(board)?;
      let id = access
        .ensure_board(board)
        .await
        .ok_or_else(|| eyre!("Board '{}' could not be resolved or created", board))?;
      println!("{}\t{}", id, board);
    }
    Command::AddItem { name } => {
      let board = require_board(board)?;
      let id = access
        .add_item(board, &name)
        .await
        .ok_or_else(|| eyre!("Item '{}' could not be added to '{}'", name, board))?;
      println!("{}\t{}", id, name);
    }
    Command::Set {
      item,
      column,
      value,
      link_text,
    } => {
      let board = require_board(board)?;
      let written = access
        .set_column_value(board, &item, &column, Some(&value), link_text.as_deref())
        .await
        .ok_or_else(|| eyre!("Column '{}' of '{}' was not changed", column, item))?;
      println!("{}\t{}\t{}", item, column, written);
    }
    Command::Get { item, column } => {
      let board = require_board(board)?;
      match access.column_value(board, &item, &column).await {
        Some(value) => println!("{}", value),
        None => println!("(empty)"),
      }
    }
    Command::Move { item, group } => {
      let board = require_board(board)?;
      access
        .move_item_to_group(board, &item, &group)
        .await
        .ok_or_else(|| eyre!("Item '{}' was not moved to '{}'", item, group))?;
      println!("{}\t{}", item, group);
    }
    Command::Boards => {
      for b in access.list_boards().await {
        println!("{}\t{}", b.id, b.name);
      }
    }
    Command::Items { recent } => {
      let items = if recent {
        access.recent_items().await
      } else {
        access.items_in_board(require_board(board)?).await
      };
      for item in items {
        println!("{}\t{}", item.id, item.name);
      }
    }
    Command::Users => {
      for user in access.list_users().await {
        println!("{}\t{}\t{}\t{}", user.id, user.name, user.email, user.user_type());
      }
    }
    Command::Smoke => smoke(access, require_board(board)?).await?,
  }
  Ok(())
}

async fn smoke<A: WorkspaceApi>(access: &mut WorkspaceAccess<A>, board: &str) -> Result<()> {
  let id = access
    .ensure_board(board)
    .await
    .ok_or_else(|| eyre!("Board '{}' could not be resolved or created", board))?;
  println!("board\t{}\t{}", id, board);

  match access.find_item(board, SMOKE_ITEM).await {
    Some(item) => println!("item\t{}\t{}", item.id, item.name),
    None => println!("item\t-\t{}", SMOKE_ITEM),
  }

  let writes = [
    ("Link", "https://github.com/", Some("Github link")),
    ("Status", "Updated", None),
    ("Task Weight", "80", None),
  ];
  for (column, value, link_text) in writes {
    report(column, access.set_column_value(board, SMOKE_ITEM, column, Some(value), link_text).await);
  }

  for user in access.list_users().await {
    println!("user\t{}\t{}\t{}", user.id, user.name, user.email);
  }

  let notes = access
    .set_column_value(board, SMOKE_ITEM, "Notes", Some("Do more testing"), None)
    .await;
  report("Notes", notes);
  Ok(())
}

fn report(column: &str, written: Option<String>) {
  match written {
    Some(value) => println!("set\t{}\t{}", column, value),
    None => println!("set\t{}\t(unchanged)", column),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::access::testing::demo;
  use crate::column::RawValue;

  #[test]
  fn test_parse_set_command() {
    let args = Args::try_parse_from([
      "mwrap",
      "--fixture",
      "ws.yaml",
      "--board",
      "Demo",
      "set",
      "Set up project",
      "Link",
      "https://example.com",
      "--link-text",
      "Home",
    ])
    .unwrap();

    assert_eq!(args.board.as_deref(), Some("Demo"));
    assert!(!args.dry_run);
    match args.command {
      Command::Set { link_text, .. } => assert_eq!(link_text.as_deref(), Some("Home")),
      other => panic!("unexpected command {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_board_required() {
    let mut fixture = demo();
    assert!(run(&mut fixture.access, None, Command::EnsureBoard).await.is_err());
    assert!(run(&mut fixture.access, None, Command::Boards).await.is_ok());
    assert!(run(&mut fixture.access, None, Command::Users).await.is_ok());
  }

  #[tokio::test]
  async fn test_smoke_against_demo_board() {
    let mut fixture = demo();
    let access = &mut fixture.access;

    run(access, Some("Demo"), Command::Smoke).await.unwrap();

    assert_eq!(access.api().calls("create_board"), 0);
    assert_eq!(
      access.column_value("Demo", SMOKE_ITEM, "Task Weight").await,
      Some(RawValue::Number(80.0))
    );
    assert_eq!(
      access.column_value("Demo", SMOKE_ITEM, "Notes").await,
      Some(RawValue::Text("Do more testing".into()))
    );
    // "Updated" is not one of the demo board's labels
    assert_eq!(
      access.item_status("Demo", SMOKE_ITEM, "Status").await.as_deref(),
      Some("Working on it")
    );
  }

  #[tokio::test]
  async fn test_smoke_against_bundled_fixture() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/workspace.yaml");
    let workspace = crate::SandboxWorkspace::load(&path).unwrap();
    let mut access = WorkspaceAccess::new(workspace, crate::RetryPolicy::immediate(30));
    let board = "Testing Board For Api";

    run(&mut access, Some(board), Command::Smoke).await.unwrap();

    assert_eq!(
      access.item_status(board, SMOKE_ITEM, "Status").await.as_deref(),
      Some("Updated")
    );
    assert_eq!(
      access.column_value(board, SMOKE_ITEM, "Link").await,
      Some(RawValue::Link {
        url: "https://github.com/".into(),
        text: Some("Github link".into()),
      })
    );
  }
}
