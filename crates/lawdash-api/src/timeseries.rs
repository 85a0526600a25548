//! Handler for `GET /timeseries`.
//!
//! Takes the shared filter params plus an optional
//! `group_by=none|country|agency`. Without `group_by` the grouping follows
//! the selection: by country when countries are selected, else by agency
//! when agencies are.

use axum::{Json, extract::State};
use axum_extra::extract::Query;
use lawdash_core::{filter::GroupBy, series::TimeSeries, store::LawsuitStore};
use serde::Deserialize;

use crate::{AppState, error::ApiError, params::FilterParams};

#[derive(Debug, Deserialize, Default)]
pub struct GroupParams {
  pub group_by: Option<GroupBy>,
}

/// `GET /timeseries?start=...&end=...[&countries=...][&agencies=...][&group_by=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<FilterParams>,
  Query(group): Query<GroupParams>,
) -> Result<Json<TimeSeries>, ApiError>
where
  S: LawsuitStore,
{
  let filter = filter.into_filter()?;
  let group_by = group.group_by.unwrap_or_else(|| GroupBy::implied_by(&filter));

  let series = state
    .store
    .monthly_counts(&filter, group_by)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(series))
}
