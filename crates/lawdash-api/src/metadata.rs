//! Handlers for `/metadata` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/metadata` | Served from the cache while fresh |
//! | `POST` | `/metadata/refresh` | Drops the cache and reloads |

use axum::{Json, extract::State};
use lawdash_core::{stats::FilterMetadata, store::LawsuitStore};

use crate::{AppState, error::ApiError};

/// `GET /metadata`
pub async fn get<S>(State(state): State<AppState<S>>) -> Result<Json<FilterMetadata>, ApiError>
where
  S: LawsuitStore,
{
  let metadata = state
    .cache
    .get_or_load(|| state.store.metadata())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(metadata))
}

/// `POST /metadata/refresh`
pub async fn refresh<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<FilterMetadata>, ApiError>
where
  S: LawsuitStore,
{
  state.cache.invalidate().await;
  tracing::info!("filter metadata cache invalidated");
  get(State(state)).await
}
