//! Calendar months and the gap-free month axis.
//!
//! A [`Month`] carries no day component. The axis for a date range is every
//! month from the month of `start` to the month of `end`, inclusive, whether
//! or not any data falls inside it.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A calendar month, ordered chronologically. Serialises as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
  year:  i32,
  month: u32,
}

impl Month {
  /// Returns `None` unless `month` is in `1..=12`.
  pub fn new(year: i32, month: u32) -> Option<Self> {
    (1..=12).contains(&month).then_some(Self { year, month })
  }

  /// Truncate a date to its month.
  pub fn of(date: NaiveDate) -> Self {
    Self { year: date.year(), month: date.month() }
  }

  pub fn year(self) -> i32 { self.year }

  pub fn month(self) -> u32 { self.month }

  /// The first calendar day of this month.
  pub fn first_day(self) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(self.year, self.month, 1)
  }

  /// The month immediately after this one.
  pub fn succ(self) -> Self {
    if self.month == 12 {
      Self { year: self.year + 1, month: 1 }
    } else {
      Self { year: self.year, month: self.month + 1 }
    }
  }

  /// Signed number of months from `self` to `other`.
  pub fn months_until(self, other: Self) -> i64 {
    (i64::from(other.year) - i64::from(self.year)) * 12
      + (i64::from(other.month) - i64::from(self.month))
  }
}

/// Longest month axis a filter may request: one hundred years.
pub const MAX_AXIS_MONTHS: i64 = 1200;

/// Every month from `start`'s month to `end`'s month, inclusive.
///
/// Returns an empty axis when `start > end`.
pub fn month_axis(start: NaiveDate, end: NaiveDate) -> Vec<Month> {
  if start > end {
    return Vec::new();
  }
  let first = Month::of(start);
  let last = Month::of(end);

  let len = first.months_until(last) + 1;
  let mut axis = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
  let mut current = first;
  while current <= last {
    axis.push(current);
    current = current.succ();
  }
  axis
}

// ─── Text form ───────────────────────────────────────────────────────────────

impl fmt::Display for Month {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.year, self.month)
  }
}

impl FromStr for Month {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || Error::InvalidMonth(s.to_owned());
    let (year, month) = s.rsplit_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    Month::new(year, month).ok_or_else(invalid)
  }
}

impl Serialize for Month {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Month {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}
