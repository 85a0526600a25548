//! JSON REST API for the lawsuit dashboard.
//!
//! Exposes an axum [`Router`] backed by any [`LawsuitStore`]. Every endpoint
//! is a read; TLS, auth and transport concerns are the caller's
//! responsibility.
//!
//! | Method | Path | Returns |
//! |--------|------|---------|
//! | `GET`  | `/metadata` | [`FilterMetadata`](lawdash_core::stats::FilterMetadata) |
//! | `POST` | `/metadata/refresh` | Reloaded metadata |
//! | `GET`  | `/timeseries` | [`TimeSeries`](lawdash_core::series::TimeSeries) |
//! | `GET`  | `/lawsuits` | [`Page`](lawdash_core::page::Page) of records |
//! | `GET`  | `/summary` | [`SummaryStats`](lawdash_core::stats::SummaryStats) |
//! | `GET`  | `/export.csv` | CSV attachment |
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", lawdash_api::api_router(store, ApiSettings::default()))
//! ```

pub mod cache;
pub mod error;
pub mod export;
pub mod lawsuits;
pub mod metadata;
pub mod params;
pub mod summary;
pub mod timeseries;

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use lawdash_core::store::LawsuitStore;

use cache::MetadataCache;
pub use error::ApiError;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Tunables for the API layer.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  /// Page size used when a request omits `page_size`.
  pub default_page_size: u64,
  /// How long filter metadata is served from cache. Zero disables caching.
  pub metadata_ttl:      Duration,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      default_page_size: 30,
      metadata_ttl:      Duration::from_secs(300),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:             Arc<S>,
  pub cache:             Arc<MetadataCache>,
  pub default_page_size: u64,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, settings: ApiSettings) -> Router<()>
where
  S: LawsuitStore + Clone + 'static,
{
  let state = AppState {
    store,
    cache: Arc::new(MetadataCache::new(settings.metadata_ttl)),
    default_page_size: settings.default_page_size,
  };

  Router::new()
    // Filter widgets
    .route("/metadata", get(metadata::get::<S>))
    .route("/metadata/refresh", post(metadata::refresh::<S>))
    // Aggregates
    .route("/timeseries", get(timeseries::handler::<S>))
    .route("/summary", get(summary::handler::<S>))
    // Rows
    .route("/lawsuits", get(lawsuits::list::<S>))
    .route("/export.csv", get(export::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
