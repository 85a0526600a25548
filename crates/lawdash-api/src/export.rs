//! Handler for `GET /export.csv`: every row matching the filter, newest
//! first, as a CSV attachment.

use axum::{extract::State, http::header, response::IntoResponse};
use axum_extra::extract::Query;
use lawdash_core::{
  lawsuit::LawsuitRecord,
  store::{LawsuitStore, fetch_all},
};

use crate::{AppState, error::ApiError, params::FilterParams};

pub const FILENAME: &str = "immigration_lawsuits.csv";

const HEADER: [&str; 4] = ["filed_date", "country", "defendant_agencies", "title"];

/// Agencies within a cell are joined with `"; "`.
pub fn render_csv(records: &[LawsuitRecord]) -> Result<Vec<u8>, csv::Error> {
  let mut writer = csv::WriterBuilder::new().from_writer(vec![]);
  writer.write_record(HEADER)?;
  for r in records {
    writer.write_record([
      r.filed_date.format("%Y-%m-%d").to_string(),
      r.country.clone(),
      r.defendant_agencies.join("; "),
      r.title.clone(),
    ])?;
  }
  writer.into_inner().map_err(|e| e.into_error().into())
}

/// `GET /export.csv?start=...&end=...[&countries=...][&agencies=...]`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(filter): Query<FilterParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: LawsuitStore,
{
  let filter = filter.into_filter()?;
  let records = fetch_all(state.store.as_ref(), &filter)
    .await
    .map_err(ApiError::from_store)?;
  let body = render_csv(&records)?;
  tracing::debug!(rows = records.len(), bytes = body.len(), "csv export rendered");

  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{FILENAME}\"")),
    ],
    body,
  ))
}
