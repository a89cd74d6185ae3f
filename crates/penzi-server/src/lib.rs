//! HTTP and console front-ends for Penzi.
//!
//! Both channels feed the same [`MessageService`]; the console stands in for
//! an SMS gateway by reading `<contact> <text>` lines and echoing every
//! outbound message.

use std::path::PathBuf;

use axum::Router;
use penzi_command::Formatter;
use penzi_core::store::Store;
use penzi_protocol::{DEFAULT_PAGE_SIZE, Engine, MessageService};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PENZI_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  /// Service number quoted in every reply.
  #[serde(default = "default_short_code")]
  pub short_code: String,
  /// Match entries per page.
  #[serde(default = "default_page_size")]
  pub page_size:  usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/penzi/penzi.db") }

fn default_short_code() -> String { "22141".to_string() }

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

impl ServerConfig {
  /// The protocol engine this configuration describes.
  pub fn engine(&self) -> Engine {
    Engine::new(Formatter::new(self.short_code.clone()), self.page_size)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the HTTP application with request tracing.
pub fn router<S>(service: MessageService<S>) -> Router
where
  S: Store + 'static,
{
  penzi_api::api_router(service).layer(TraceLayer::new_for_http())
}

// ─── Console channel ─────────────────────────────────────────────────────────

/// Split a console line into `(contact, text)`.
pub fn parse_console_line(line: &str) -> Option<(&str, &str)> {
  let (contact, text) = line.trim().split_once(char::is_whitespace)?;
  Some((contact, text.trim()))
}

/// Feed every line of `input` through `service`, writing each outbound
/// message to `output` as `-> <to>: <text>`.
///
/// Returns the number of messages handled.
pub async fn run_console<S, R, W>(
  service: &MessageService<S>,
  input: R,
  mut output: W,
) -> std::io::Result<usize>
where
  S: Store + 'static,
  R: AsyncBufRead + Unpin,
  W: AsyncWrite + Unpin,
{
  let mut lines = input.lines();
  let mut handled = 0;

  while let Some(line) = lines.next_line().await? {
    if line.trim().is_empty() {
      continue;
    }
    let Some((contact, text)) = parse_console_line(&line) else {
      output
        .write_all(b"!! expected: <contact> <message>\n")
        .await?;
      continue;
    };

    let exchange = service.submit(contact, text).await;
    tracing::debug!(contact, status = exchange.status.as_str(), "console message");
    for reply in &exchange.replies {
      output
        .write_all(format!("-> {}: {}\n", reply.to, reply.text).as_bytes())
        .await?;
    }
    output.flush().await?;
    handled += 1;
  }

  Ok(handled)
}
