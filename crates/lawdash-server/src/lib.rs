//! HTTP server wiring for the lawsuit dashboard.
//!
//! Opens the SQLite store named in [`ServerConfig`], optionally snapshots it
//! into memory, and mounts the JSON API under `/api`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::Router;
use lawdash_api::{ApiSettings, api_router};
use lawdash_core::memory::MemoryStore;
use lawdash_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Where queries are evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
  /// Every request is answered by SQL against the database file.
  #[default]
  Sql,
  /// Eligible rows are loaded once at startup and filtered in memory.
  Memory,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `LAWDASH_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  pub store_path:        PathBuf,
  #[serde(default)]
  pub store_mode:        StoreMode,
  #[serde(default = "default_page_size")]
  pub default_page_size: u64,
  /// Zero disables the metadata cache.
  #[serde(default = "default_metadata_ttl_secs")]
  pub metadata_ttl_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8050 }
fn default_page_size() -> u64 { 30 }
fn default_metadata_ttl_secs() -> u64 { 300 }

impl ServerConfig {
  /// Layer `LAWDASH_*` environment variables over the TOML file at `path`.
  /// A missing file is not an error.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("LAWDASH"))
      .build()
      .context("failed to read config file")?;

    let cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    anyhow::ensure!(self.default_page_size > 0, "default_page_size must be positive");
    Ok(())
  }

  pub fn api_settings(&self) -> ApiSettings {
    ApiSettings {
      default_page_size: self.default_page_size,
      metadata_ttl:      Duration::from_secs(self.metadata_ttl_secs),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// Open the configured store and build the full application router.
pub async fn build_app(cfg: &ServerConfig) -> anyhow::Result<Router> {
  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let api = match cfg.store_mode {
    StoreMode::Sql => api_router(Arc::new(store), cfg.api_settings()),
    StoreMode::Memory => {
      let records = store
        .load_eligible()
        .await
        .context("failed to load lawsuits into memory")?;
      info!(count = records.len(), "serving from in-memory snapshot");
      api_router(Arc::new(MemoryStore::new(records)), cfg.api_settings())
    }
  };

  Ok(Router::new().nest("/api", api).layer(TraceLayer::new_for_http()))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
