//! Query-string parameters shared by the filtered endpoints.
//!
//! `countries` and `agencies` are repeated keys
//! (`countries=India&countries=Korea%2C%20Republic%20of`), so values may
//! contain commas. Handlers extract them with [`axum_extra::extract::Query`];
//! axum's own `Query` cannot collect repeated keys. No values, or only empty
//! ones, leave that dimension unrestricted. `score_min` and `score_max` must
//! be given together.

use chrono::NaiveDate;
use lawdash_core::{filter::LawsuitFilter, page::PageRequest};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct FilterParams {
  /// Inclusive first filing date, `YYYY-MM-DD`.
  pub start:     NaiveDate,
  /// Inclusive last filing date, `YYYY-MM-DD`.
  pub end:       NaiveDate,
  #[serde(default)]
  pub countries: Vec<String>,
  #[serde(default)]
  pub agencies:  Vec<String>,
  pub score_min: Option<f64>,
  pub score_max: Option<f64>,
}

impl FilterParams {
  pub fn into_filter(self) -> Result<LawsuitFilter, ApiError> {
    let mut filter = LawsuitFilter::new(self.start, self.end)
      .with_countries(non_empty(self.countries))
      .with_agencies(non_empty(self.agencies));

    filter = match (self.score_min, self.score_max) {
      (Some(min), Some(max)) => filter.with_score(min, max),
      (None, None) => filter,
      _ => {
        return Err(ApiError::BadRequest(
          "score_min and score_max must be given together".into(),
        ));
      }
    };
    Ok(filter)
  }
}

fn non_empty(values: Vec<String>) -> impl Iterator<Item = String> {
  values.into_iter().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, Default)]
pub struct PageParams {
  /// 1-based; defaults to the first page.
  pub page:      Option<u64>,
  /// Defaults to the server's configured page size.
  pub page_size: Option<u64>,
}

impl PageParams {
  pub fn into_request(self, default_page_size: u64) -> Result<PageRequest, ApiError> {
    PageRequest::new(
      self.page.unwrap_or(1),
      self.page_size.unwrap_or(default_page_size),
    )
    .map_err(|e| ApiError::BadRequest(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(query: &str) -> FilterParams { serde_json::from_str(query).unwrap() }

  #[test]
  fn list_values_are_kept_verbatim_and_empty_ones_dropped() {
    let filter = params(
      r#"{"start":"2023-01-01","end":"2023-06-30","countries":["Korea, Republic of","","India"],"agencies":[""]}"#,
    )
    .into_filter()
    .unwrap();
    assert_eq!(
      filter.countries.iter().map(String::as_str).collect::<Vec<_>>(),
      ["India", "Korea, Republic of"]
    );
    assert!(filter.agencies.is_empty());
    assert!(filter.score.is_none());
  }

  #[test]
  fn absent_lists_default_to_unrestricted() {
    let filter = params(r#"{"start":"2023-01-01","end":"2023-06-30"}"#).into_filter().unwrap();
    assert!(filter.countries.is_empty() && filter.agencies.is_empty());
  }

  #[test]
  fn half_a_score_range_is_rejected() {
    let err = params(r#"{"start":"2023-01-01","end":"2023-06-30","score_min":1.5}"#)
      .into_filter()
      .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
  }

  #[test]
  fn page_defaults_apply() {
    let request = PageParams::default().into_request(30).unwrap();
    assert_eq!((request.page, request.page_size), (1, 30));

    let zero = PageParams { page: Some(0), page_size: None }.into_request(30);
    assert!(matches!(zero, Err(ApiError::BadRequest(_))));
  }
}
