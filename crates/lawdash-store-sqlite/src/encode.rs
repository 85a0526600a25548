//! Decoding helpers between SQLite column text and domain types.
//!
//! Timestamps arrive normalised to UTC by `strftime` in the derived view;
//! calendar dates arrive as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use lawdash_core::{
  Error as CoreError,
  lawsuit::{GptSummary, LawsuitRecord},
};
use rusqlite::types::ValueRef;
use tracing::warn;

use crate::{Error, Result};

// ─── DateTime<Utc> / NaiveDate ──────────────────────────────────────────────

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from the derived view for one eligible row.
pub struct RawLawsuit {
  pub id:                  i64,
  /// `NULL` when SQLite cannot parse the stored timestamp.
  pub filed_utc:           Option<String>,
  pub title:               String,
  /// `None` when the stored document is not text, e.g. a JSONB blob.
  pub gpt_summary:         Option<String>,
  pub agency_manually_set: Option<String>,
}

impl RawLawsuit {
  pub const COLUMNS: &'static str = "id, filed_utc, title, gpt_summary, agency_manually_set";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      filed_utc:           row.get(1)?,
      title:               row.get(2)?,
      gpt_summary:         match row.get_ref(3)? {
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
        _ => None,
      },
      agency_manually_set: row.get(4)?,
    })
  }

  /// A malformed `gpt_summary` does not fail the row; its derived fields
  /// take their defaults.
  pub fn into_record(self) -> Result<LawsuitRecord> {
    let filed = self
      .filed_utc
      .as_deref()
      .ok_or_else(|| Error::DateParse(format!("lawsuit {} has an unreadable filing date", self.id)))
      .and_then(decode_dt)?;

    let summary = self
      .gpt_summary
      .ok_or_else(|| CoreError::MalformedDocument("gpt_summary is not text".into()))
      .and_then(|raw| GptSummary::decode(&raw))
      .unwrap_or_else(|e| {
        warn!(lawsuit_id = self.id, error = %e, "gpt_summary unreadable; using defaults");
        GptSummary::default()
      });

    Ok(LawsuitRecord::new(
      self.id,
      filed,
      self.title,
      self.agency_manually_set,
      summary,
    ))
  }
}
