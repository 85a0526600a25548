//! Handler for `GET /summary`.

use axum::{Json, extract::State};
use axum_extra::extract::Query;
use lawdash_core::{stats::SummaryStats, store::LawsuitStore};

use crate::{AppState, error::ApiError, params::FilterParams};

/// `GET /summary?start=...&end=...[&countries=...][&agencies=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<FilterParams>,
) -> Result<Json<SummaryStats>, ApiError>
where
  S: LawsuitStore,
{
  let filter = filter.into_filter()?;
  let stats = state
    .store
    .summary(&filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}
