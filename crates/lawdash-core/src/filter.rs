//! Filter selections and the predicate expressions built from them.
//!
//! A [`LawsuitFilter`] is the four-dimension selection made in the dashboard
//! sidebar. [`LawsuitFilter::predicate`] turns it into a [`Predicate`] tree.
//! Backends either evaluate that tree directly ([`Predicate::matches`]) or
//! render it to a query language with every [`Operand`] bound as a parameter.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  lawsuit::LawsuitRecord,
  month::{MAX_AXIS_MONTHS, Month},
};

// ─── Selection ───────────────────────────────────────────────────────────────

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end:   NaiveDate,
}

/// An inclusive range over the `221g_score` dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
  pub min: f64,
  pub max: f64,
}

/// The sidebar selection. Empty sets and an absent score range never exclude
/// anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawsuitFilter {
  pub dates:     DateRange,
  #[serde(default)]
  pub countries: BTreeSet<String>,
  #[serde(default)]
  pub agencies:  BTreeSet<String>,
  #[serde(default)]
  pub score:     Option<ScoreRange>,
}

impl LawsuitFilter {
  /// A filter over `[start, end]` with no other restriction.
  pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
    Self {
      dates:     DateRange { start, end },
      countries: BTreeSet::new(),
      agencies:  BTreeSet::new(),
      score:     None,
    }
  }

  pub fn with_countries<I, S>(mut self, countries: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.countries = countries.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_agencies<I, S>(mut self, agencies: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.agencies = agencies.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_score(mut self, min: f64, max: f64) -> Self {
    self.score = Some(ScoreRange { min, max });
    self
  }

  /// Reject selections that cannot match anything meaningful.
  pub fn validate(&self) -> Result<()> {
    if self.dates.start > self.dates.end {
      return Err(Error::InvalidFilter(format!(
        "start date {} is after end date {}",
        self.dates.start, self.dates.end
      )));
    }
    let months = Month::of(self.dates.start).months_until(Month::of(self.dates.end)) + 1;
    if months > MAX_AXIS_MONTHS {
      return Err(Error::InvalidFilter(format!(
        "date range spans {months} months; at most {MAX_AXIS_MONTHS} are allowed"
      )));
    }
    if let Some(ScoreRange { min, max }) = self.score {
      if !min.is_finite() || !max.is_finite() {
        return Err(Error::InvalidFilter(format!(
          "score bounds must be finite, got [{min}, {max}]"
        )));
      }
      if min > max {
        return Err(Error::InvalidFilter(format!(
          "score minimum {min} is above maximum {max}"
        )));
      }
    }
    Ok(())
  }

  /// The conjunction of eligibility and every active dimension.
  pub fn predicate(&self) -> Predicate {
    let mut terms = vec![
      Predicate::Eligible,
      Predicate::Between {
        field: Field::FiledDate,
        low:   Operand::Date(self.dates.start),
        high:  Operand::Date(self.dates.end),
      },
    ];
    if !self.countries.is_empty() {
      terms.push(Predicate::In {
        field:  Field::Country,
        values: self.countries.iter().cloned().map(Operand::Text).collect(),
      });
    }
    if !self.agencies.is_empty() {
      terms.push(Predicate::In {
        field:  Field::Agency,
        values: self.agencies.iter().cloned().map(Operand::Text).collect(),
      });
    }
    if let Some(ScoreRange { min, max }) = self.score {
      terms.push(Predicate::Between {
        field: Field::Score,
        low:   Operand::Number(min),
        high:  Operand::Number(max),
      });
    }
    Predicate::And(terms)
  }
}

// ─── Grouping ────────────────────────────────────────────────────────────────

/// The optional categorical breakdown of a time series.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupBy {
  #[default]
  #[serde(rename = "none")]
  #[strum(serialize = "none")]
  Ungrouped,
  Country,
  Agency,
}

impl GroupBy {
  /// The grouping the dashboard applies when none is requested: by country
  /// when countries are selected, else by agency when agencies are selected.
  pub fn implied_by(filter: &LawsuitFilter) -> Self {
    if !filter.countries.is_empty() {
      Self::Country
    } else if !filter.agencies.is_empty() {
      Self::Agency
    } else {
      Self::Ungrouped
    }
  }

  /// The dimension this grouping breaks out, if any.
  pub fn field(self) -> Option<Field> {
    match self {
      Self::Ungrouped => None,
      Self::Country => Some(Field::Country),
      Self::Agency => Some(Field::Agency),
    }
  }
}

// ─── Predicate expressions ───────────────────────────────────────────────────

/// A derived dimension of a lawsuit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  FiledDate,
  Country,
  Agency,
  Score,
}

impl Field {
  fn of(self, record: &LawsuitRecord) -> Operand {
    match self {
      Field::FiledDate => Operand::Date(record.filed_date),
      Field::Country => Operand::Text(record.country.clone()),
      Field::Agency => Operand::Text(record.agency.clone()),
      Field::Score => Operand::Number(record.score),
    }
  }
}

/// A literal compared against a [`Field`]. Always bound, never spliced.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
  Date(NaiveDate),
  Text(String),
  Number(f64),
}

impl PartialOrd for Operand {
  fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
    match (self, other) {
      (Operand::Date(a), Operand::Date(b)) => a.partial_cmp(b),
      (Operand::Text(a), Operand::Text(b)) => a.partial_cmp(b),
      (Operand::Number(a), Operand::Number(b)) => a.partial_cmp(b),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  /// Both `gpt_summary` and `law360_data` are present.
  Eligible,
  /// `low <= field <= high`.
  Between {
    field: Field,
    low:   Operand,
    high:  Operand,
  },
  /// `field` equals one of `values`. An empty list matches nothing.
  In {
    field:  Field,
    values: Vec<Operand>,
  },
  /// All terms hold. An empty conjunction matches everything.
  And(Vec<Predicate>),
}

impl Predicate {
  /// Evaluate against an in-memory record.
  ///
  /// Records only exist in memory once they are eligible, so
  /// [`Predicate::Eligible`] always holds here.
  pub fn matches(&self, record: &LawsuitRecord) -> bool {
    match self {
      Predicate::Eligible => true,
      Predicate::Between { field, low, high } => {
        let value = field.of(record);
        low <= &value && &value <= high
      }
      Predicate::In { field, values } => {
        let value = field.of(record);
        values.contains(&value)
      }
      Predicate::And(terms) => terms.iter().all(|t| t.matches(record)),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};

  use super::*;
  use crate::lawsuit::GptSummary;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn record(filed: &str, summary: &str, agency: Option<&str>) -> LawsuitRecord {
    LawsuitRecord::new(
      1,
      filed.parse::<DateTime<Utc>>().unwrap(),
      "Case".into(),
      agency.map(str::to_owned),
      GptSummary::decode(summary).unwrap(),
    )
  }

  fn year_2023() -> LawsuitFilter { LawsuitFilter::new(date(2023, 1, 1), date(2023, 12, 31)) }

  #[test]
  fn empty_dimensions_only_restrict_dates() {
    let p = year_2023().predicate();
    assert_eq!(
      p,
      Predicate::And(vec![
        Predicate::Eligible,
        Predicate::Between {
          field: Field::FiledDate,
          low:   Operand::Date(date(2023, 1, 1)),
          high:  Operand::Date(date(2023, 12, 31)),
        },
      ])
    );
    let r = record("2023-06-01T00:00:00Z", r#"{"likely_country_of_origin":"Iran"}"#, None);
    assert!(p.matches(&r));
  }

  #[test]
  fn date_bounds_are_inclusive() {
    let p = year_2023().predicate();
    assert!(p.matches(&record("2023-01-01T00:00:00Z", "{}", None)));
    assert!(p.matches(&record("2023-12-31T23:59:59Z", "{}", None)));
    assert!(!p.matches(&record("2024-01-01T00:00:00Z", "{}", None)));
  }

  #[test]
  fn country_agency_and_score_all_apply() {
    let p = year_2023()
      .with_countries(["India", "Mexico"])
      .with_agencies(["USCIS"])
      .with_score(1.0, 5.0)
      .predicate();

    let hit = record(
      "2023-03-01T00:00:00Z",
      r#"{"likely_country_of_origin":"India","221g_score":3}"#,
      Some("USCIS"),
    );
    assert!(p.matches(&hit));

    let wrong_country = record(
      "2023-03-01T00:00:00Z",
      r#"{"likely_country_of_origin":"Iran","221g_score":3}"#,
      Some("USCIS"),
    );
    assert!(!p.matches(&wrong_country));

    let unknown_agency = record(
      "2023-03-01T00:00:00Z",
      r#"{"likely_country_of_origin":"India","221g_score":3}"#,
      None,
    );
    assert!(!p.matches(&unknown_agency));

    let out_of_score = record(
      "2023-03-01T00:00:00Z",
      r#"{"likely_country_of_origin":"India","221g_score":9}"#,
      Some("USCIS"),
    );
    assert!(!p.matches(&out_of_score));
  }

  #[test]
  fn validate_rejects_inverted_and_non_finite_ranges() {
    assert!(year_2023().validate().is_ok());
    assert!(matches!(
      LawsuitFilter::new(date(2023, 3, 1), date(2023, 1, 1)).validate(),
      Err(Error::InvalidFilter(_))
    ));
    assert!(matches!(
      year_2023().with_score(f64::NAN, 1.0).validate(),
      Err(Error::InvalidFilter(_))
    ));
    assert!(matches!(
      year_2023().with_score(0.0, f64::INFINITY).validate(),
      Err(Error::InvalidFilter(_))
    ));
    assert!(matches!(
      year_2023().with_score(5.0, 1.0).validate(),
      Err(Error::InvalidFilter(_))
    ));
  }

  #[test]
  fn validate_caps_the_month_axis() {
    let century = LawsuitFilter::new(date(1950, 1, 1), date(2049, 12, 31));
    assert!(century.validate().is_ok());

    let longer = LawsuitFilter::new(date(1950, 1, 1), date(2050, 1, 1));
    assert!(matches!(longer.validate(), Err(Error::InvalidFilter(_))));

    let extreme = LawsuitFilter::new(
      NaiveDate::from_ymd_opt(-200_000, 1, 1).unwrap(),
      NaiveDate::from_ymd_opt(200_000, 12, 31).unwrap(),
    );
    assert!(extreme.validate().is_err());
  }

  #[test]
  fn implied_grouping_prefers_country() {
    assert_eq!(GroupBy::implied_by(&year_2023()), GroupBy::Ungrouped);
    assert_eq!(
      GroupBy::implied_by(&year_2023().with_agencies(["DOS"])),
      GroupBy::Agency
    );
    assert_eq!(
      GroupBy::implied_by(&year_2023().with_agencies(["DOS"]).with_countries(["Iran"])),
      GroupBy::Country
    );
  }

  #[test]
  fn group_by_text_forms() {
    assert_eq!(GroupBy::Ungrouped.to_string(), "none");
    assert_eq!("agency".parse::<GroupBy>().unwrap(), GroupBy::Agency);
    assert_eq!(serde_json::to_string(&GroupBy::Country).unwrap(), "\"country\"");
    assert_eq!(
      serde_json::from_str::<GroupBy>("\"none\"").unwrap(),
      GroupBy::Ungrouped
    );
  }
}
