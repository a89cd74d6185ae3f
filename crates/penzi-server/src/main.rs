//! penzi-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the message API over HTTP. With
//! `--console` it reads `<contact> <text>` lines from stdin instead.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use penzi_protocol::MessageService;
use penzi_server::ServerConfig;
use penzi_store_sqlite::SqliteStore;
use tokio::{io::BufReader, net::TcpListener};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Penzi SMS matchmaking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read `<contact> <text>` lines from stdin instead of serving HTTP.
  #[arg(long)]
  console: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so console replies own stdout.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PENZI"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let service = MessageService::new(store, server_cfg.engine());

  if cli.console {
    tracing::info!("Reading messages from stdin");
    let handled = penzi_server::run_console(
      &service,
      BufReader::new(tokio::io::stdin()),
      tokio::io::stdout(),
    )
    .await
    .context("console channel failed")?;
    tracing::info!(handled, "stdin closed");
    return Ok(());
  }

  let app = penzi_server::router(service);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
