use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mwrap::cli::{self, Args};
use mwrap::config::{Config, LogConfig};
use mwrap::{SandboxWorkspace, WorkspaceAccess};

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let _log_guard = init_logging(&config.log)?;

  // Command line wins over the configured default board
  let board = args.board.clone().or_else(|| config.default_board.clone());

  let workspace = SandboxWorkspace::load(&args.fixture)?;
  let mut access = WorkspaceAccess::from_config(workspace, &config);

  let result = cli::run(&mut access, board.as_deref(), args.command).await;

  if args.dry_run {
    info!("Dry run, {} left unchanged", args.fixture.display());
  } else {
    access.api().save(&args.fixture)?;
  }

  result
}

/// Install the global subscriber. The returned guard flushes the log file
/// on drop and must live until exit.
fn init_logging(log: &LogConfig) -> Result<Option<WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(log.filter.as_deref().unwrap_or("info")))?;

  match &log.file {
    Some(path) => {
      let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| eyre!("Failed to open log file {}: {}", path.display(), e))?;
      let (writer, guard) = tracing_appender::non_blocking(file);

      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
      Ok(None)
    }
  }
}
