//! Summary statistics and filter-widget metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline numbers for a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
  pub total:              u64,
  pub countries_involved: u64,
  /// `total` spread over the days between the first and last filing,
  /// rounded to one decimal place.
  pub average_per_day:    f64,
  pub first_filed:        Option<NaiveDate>,
  pub last_filed:         Option<NaiveDate>,
}

impl SummaryStats {
  pub fn empty() -> Self {
    Self {
      total:              0,
      countries_involved: 0,
      average_per_day:    0.0,
      first_filed:        None,
      last_filed:         None,
    }
  }

  pub fn from_parts(
    total: u64,
    countries_involved: u64,
    first_filed: Option<NaiveDate>,
    last_filed: Option<NaiveDate>,
  ) -> Self {
    Self {
      total,
      countries_involved,
      average_per_day: average_per_day(total, first_filed, last_filed),
      first_filed,
      last_filed,
    }
  }
}

/// A span shorter than one day counts as one day.
fn average_per_day(
  total: u64,
  first: Option<NaiveDate>,
  last: Option<NaiveDate>,
) -> f64 {
  let (Some(first), Some(last)) = (first, last) else {
    return 0.0;
  };
  let days = (last - first).num_days().max(1);
  let avg = total as f64 / days as f64;
  (avg * 10.0).round() / 10.0
}

/// Values needed to populate filter widgets, computed over every eligible
/// record regardless of the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
  /// Distinct countries, sorted.
  pub countries:      Vec<String>,
  /// Distinct agencies, sorted.
  pub agencies:       Vec<String>,
  pub min_filed:      Option<NaiveDate>,
  pub max_filed:      Option<NaiveDate>,
  pub min_score:      Option<f64>,
  pub max_score:      Option<f64>,
  pub total_eligible: u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> { NaiveDate::from_ymd_opt(y, m, d) }

  #[test]
  fn average_rounds_to_one_decimal() {
    let s = SummaryStats::from_parts(10, 2, date(2023, 1, 1), date(2023, 1, 4));
    assert_eq!(s.average_per_day, 3.3);
  }

  #[test]
  fn same_day_counts_as_one_day() {
    let s = SummaryStats::from_parts(4, 1, date(2023, 1, 1), date(2023, 1, 1));
    assert_eq!(s.average_per_day, 4.0);
  }

  #[test]
  fn empty_set_averages_zero() {
    let s = SummaryStats::from_parts(0, 0, None, None);
    assert_eq!(s, SummaryStats::empty());
  }
}
