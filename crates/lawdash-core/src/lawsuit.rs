//! Lawsuit records and their semi-structured `gpt_summary` document.
//!
//! Every derived field has an explicit default that applies when the field is
//! absent, null, or of the wrong type. A document that is not a JSON object at
//! all decodes to [`GptSummary::default`], which carries the same defaults.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Country assigned when a summary does not name one.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Agency assigned when `agency_manually_set` is null.
pub const UNKNOWN_AGENCY: &str = "Unknown";

// ─── gpt_summary ─────────────────────────────────────────────────────────────

/// The typed view of a `gpt_summary` document.
///
/// Each field decodes independently, so one bad field never discards the
/// others.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GptSummary {
  #[serde(default, deserialize_with = "lenient")]
  likely_country_of_origin: Option<String>,
  #[serde(default, deserialize_with = "agency_list")]
  defendant_agency:         Vec<String>,
  #[serde(rename = "221g_score", default, deserialize_with = "lenient")]
  score:                    Option<f64>,
}

impl GptSummary {
  /// Decode a raw document.
  ///
  /// Fails with [`Error::MalformedDocument`] only when `raw` is not a JSON
  /// object; callers are expected to fall back to the default summary.
  pub fn decode(raw: &str) -> Result<Self> {
    let value: serde_json::Value = serde_json::from_str(raw)
      .map_err(|e| Error::MalformedDocument(e.to_string()))?;
    if !value.is_object() {
      return Err(Error::MalformedDocument(format!(
        "expected a JSON object, found {}",
        json_kind(&value)
      )));
    }
    Ok(serde_json::from_value(value)?)
  }

  pub fn country(&self) -> &str {
    self
      .likely_country_of_origin
      .as_deref()
      .unwrap_or(UNKNOWN_COUNTRY)
  }

  pub fn score(&self) -> f64 { self.score.unwrap_or(0.0) }

  pub fn defendant_agencies(&self) -> &[String] { &self.defendant_agency }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
  match value {
    serde_json::Value::Null => "null",
    serde_json::Value::Bool(_) => "a boolean",
    serde_json::Value::Number(_) => "a number",
    serde_json::Value::String(_) => "a string",
    serde_json::Value::Array(_) => "an array",
    serde_json::Value::Object(_) => "an object",
  }
}

/// Decode a field as `T`, yielding `None` on null or a type mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  Ok(serde_json::from_value(value).ok())
}

/// Keep the non-null entries of an agency array, stringifying scalars.
/// Anything other than an array yields an empty list.
fn agency_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  let serde_json::Value::Array(items) = value else {
    return Ok(Vec::new());
  };
  Ok(
    items
      .into_iter()
      .filter_map(|item| match item {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
      })
      .collect(),
  )
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One eligible lawsuit with its derived filter dimensions resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawsuitRecord {
  pub id:                 i64,
  pub filed:              DateTime<Utc>,
  /// Calendar date of `filed` in UTC.
  pub filed_date:         NaiveDate,
  pub title:              String,
  pub country:            String,
  /// `agency_manually_set`, defaulted to [`UNKNOWN_AGENCY`].
  pub agency:             String,
  pub defendant_agencies: Vec<String>,
  pub score:              f64,
}

impl LawsuitRecord {
  pub fn new(
    id: i64,
    filed: DateTime<Utc>,
    title: String,
    agency_manually_set: Option<String>,
    summary: GptSummary,
  ) -> Self {
    Self {
      id,
      filed,
      filed_date: filed.date_naive(),
      title,
      country: summary.country().to_owned(),
      agency: agency_manually_set.unwrap_or_else(|| UNKNOWN_AGENCY.to_owned()),
      score: summary.score(),
      defendant_agencies: summary.defendant_agency,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_document_decodes() {
    let s = GptSummary::decode(
      r#"{"likely_country_of_origin":"India","defendant_agency":["USCIS","DOS"],"221g_score":7}"#,
    )
    .unwrap();
    assert_eq!(s.country(), "India");
    assert_eq!(s.defendant_agencies(), ["USCIS", "DOS"]);
    assert_eq!(s.score(), 7.0);
  }

  #[test]
  fn absent_fields_take_defaults() {
    let s = GptSummary::decode("{}").unwrap();
    assert_eq!(s.country(), UNKNOWN_COUNTRY);
    assert!(s.defendant_agencies().is_empty());
    assert_eq!(s.score(), 0.0);
  }

  #[test]
  fn null_and_mistyped_fields_default_independently() {
    let s = GptSummary::decode(
      r#"{"likely_country_of_origin":42,"defendant_agency":null,"221g_score":"high"}"#,
    )
    .unwrap();
    assert_eq!(s.country(), UNKNOWN_COUNTRY);
    assert!(s.defendant_agencies().is_empty());
    assert_eq!(s.score(), 0.0);

    let s = GptSummary::decode(
      r#"{"likely_country_of_origin":"Iran","defendant_agency":"USCIS","221g_score":2.5}"#,
    )
    .unwrap();
    assert_eq!(s.country(), "Iran");
    assert!(s.defendant_agencies().is_empty());
    assert_eq!(s.score(), 2.5);
  }

  #[test]
  fn agency_list_drops_nulls_and_stringifies_scalars() {
    let s = GptSummary::decode(r#"{"defendant_agency":["USCIS",null,3]}"#).unwrap();
    assert_eq!(s.defendant_agencies(), ["USCIS", "3"]);
  }

  #[test]
  fn non_object_documents_are_malformed() {
    assert!(matches!(
      GptSummary::decode("not json"),
      Err(Error::MalformedDocument(_))
    ));
    assert!(matches!(
      GptSummary::decode("[1, 2]"),
      Err(Error::MalformedDocument(_))
    ));
  }

  #[test]
  fn record_defaults_agency() {
    let filed = "2023-05-02T23:30:00Z".parse::<DateTime<Utc>>().unwrap();
    let r = LawsuitRecord::new(1, filed, "Doe v. Blinken".into(), None, GptSummary::default());
    assert_eq!(r.agency, UNKNOWN_AGENCY);
    assert_eq!(r.country, UNKNOWN_COUNTRY);
    assert_eq!(r.filed_date, NaiveDate::from_ymd_opt(2023, 5, 2).unwrap());
  }
}
