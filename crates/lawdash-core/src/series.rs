//! Zero-filled monthly time series.
//!
//! Backends only report the `(month[, group], count)` combinations that
//! actually occur. The functions here join those counts onto the canonical
//! month axis so that every month (and, when grouped, every month × used
//! category) appears exactly once.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{filter::GroupBy, month::Month};

/// One point of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
  pub month: Month,
  /// The category of a grouped series; absent for the ungrouped total.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group: Option<String>,
  pub count: u64,
}

/// A monthly series, ordered by month then category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeries {
  pub group_by: GroupBy,
  pub points:   Vec<SeriesPoint>,
}

impl TimeSeries {
  pub fn empty(group_by: GroupBy) -> Self { Self { group_by, points: Vec::new() } }

  /// Sum of all counts.
  pub fn total(&self) -> u64 { self.points.iter().map(|p| p.count).sum() }

  /// The distinct categories, sorted.
  pub fn groups(&self) -> Vec<&str> {
    self
      .points
      .iter()
      .filter_map(|p| p.group.as_deref())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect()
  }
}

/// Join ungrouped counts onto `axis`; months without a count get zero.
///
/// Counts for months outside the axis are ignored.
pub fn fill_totals(axis: &[Month], counts: impl IntoIterator<Item = (Month, u64)>) -> TimeSeries {
  let mut by_month: HashMap<Month, u64> = HashMap::new();
  for (month, count) in counts {
    *by_month.entry(month).or_default() += count;
  }

  let points = axis
    .iter()
    .map(|&month| SeriesPoint {
      month,
      group: None,
      count: by_month.get(&month).copied().unwrap_or(0),
    })
    .collect();

  TimeSeries { group_by: GroupBy::Ungrouped, points }
}

/// Join grouped counts onto `axis` × the categories present in `counts`.
///
/// Only categories that occur in `counts` (restricted to the axis) appear,
/// and each appears in every month. With no counts the result is empty: a
/// category that never occurs cannot be zero-filled.
pub fn fill_grouped(
  axis: &[Month],
  group_by: GroupBy,
  counts: impl IntoIterator<Item = (Month, String, u64)>,
) -> TimeSeries {
  let (Some(&first), Some(&last)) = (axis.first(), axis.last()) else {
    return TimeSeries::empty(group_by);
  };

  let mut by_key: HashMap<(Month, String), u64> = HashMap::new();
  let mut groups: BTreeSet<String> = BTreeSet::new();
  for (month, group, count) in counts {
    if month < first || month > last {
      continue;
    }
    groups.insert(group.clone());
    *by_key.entry((month, group)).or_default() += count;
  }

  let mut points = Vec::with_capacity(axis.len() * groups.len());
  for &month in axis {
    for group in &groups {
      let count = by_key.get(&(month, group.clone())).copied().unwrap_or(0);
      points.push(SeriesPoint { month, group: Some(group.clone()), count });
    }
  }

  TimeSeries { group_by, points }
}
