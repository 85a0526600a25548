//! Handler for `GET /lawsuits`, the paginated case table.
//!
//! Rows are newest first. A page past the end of the result is a 404; the
//! first page of an empty result is an empty 200.

use axum::{Json, extract::State};
use axum_extra::extract::Query;
use lawdash_core::{lawsuit::LawsuitRecord, page::Page, store::LawsuitStore};

use crate::{
  AppState,
  error::ApiError,
  params::{FilterParams, PageParams},
};

/// `GET /lawsuits?start=...&end=...[&page=...][&page_size=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<FilterParams>,
  Query(paging): Query<PageParams>,
) -> Result<Json<Page<LawsuitRecord>>, ApiError>
where
  S: LawsuitStore,
{
  let filter = filter.into_filter()?;
  let request = paging.into_request(state.default_page_size)?;

  let page = state
    .store
    .fetch_page(&filter, request)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(page))
}
