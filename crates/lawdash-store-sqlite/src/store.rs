//! The SQLite implementation of [`LawsuitStore`].

use std::path::Path;

use lawdash_core::{
  filter::{Field, GroupBy, LawsuitFilter, Predicate},
  lawsuit::LawsuitRecord,
  month::{Month, month_axis},
  page::{Page, PageRequest, last_page},
  series::{TimeSeries, fill_grouped, fill_totals},
  stats::{FilterMetadata, SummaryStats},
  store::LawsuitStore,
};
use rusqlite::types::Value;
use tracing::{debug, warn};

use crate::{
  Error, Result,
  encode::{RawLawsuit, decode_opt_date},
  schema::SCHEMA,
  sql::{DERIVED, column, render},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A lawsuit store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the table exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every eligible record, in id order. Used to seed a
  /// [`MemoryStore`](lawdash_core::memory::MemoryStore).
  pub async fn load_eligible(&self) -> Result<Vec<LawsuitRecord>> {
    let where_clause = render(&Predicate::Eligible);
    let sql = format!(
      "{DERIVED}
       SELECT {columns} FROM derived
       WHERE {predicate} AND filed_utc IS NOT NULL
       ORDER BY id",
      columns = RawLawsuit::COLUMNS,
      predicate = where_clause.sql,
    );

    let raws: Vec<RawLawsuit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawLawsuit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(count = raws.len(), "loaded eligible lawsuits");
    raws.into_iter().map(RawLawsuit::into_record).collect()
  }

  /// Run a single-row aggregate query over the derived view.
  async fn query_one<T, F>(&self, sql: String, params: Vec<Value>, map: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let value = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(params), map)?)
      })
      .await?;
    Ok(value)
  }

  async fn distinct(&self, field: &'static str, eligible: &Predicate) -> Result<Vec<String>> {
    let where_clause = render(eligible);
    let sql = format!(
      "{DERIVED}
       SELECT DISTINCT {field} FROM derived
       WHERE {predicate}
       ORDER BY {field}",
      predicate = where_clause.sql,
    );

    let values = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(where_clause.params), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(values)
  }
}

/// Log and swallow a filter that cannot match.
fn rejected(filter: &LawsuitFilter) -> bool {
  match filter.validate() {
    Ok(()) => false,
    Err(e) => {
      debug!(error = %e, "filter rejected before querying");
      true
    }
  }
}

// ─── LawsuitStore impl ───────────────────────────────────────────────────────

impl LawsuitStore for SqliteStore {
  type Error = Error;

  async fn metadata(&self) -> Result<FilterMetadata> {
    let eligible = Predicate::Eligible;
    let countries = self.distinct(column(Field::Country), &eligible).await?;
    let agencies = self.distinct(column(Field::Agency), &eligible).await?;

    let where_clause = render(&eligible);
    let sql = format!(
      "{DERIVED}
       SELECT MIN(filed_date), MAX(filed_date), MIN(score), MAX(score), COUNT(*)
       FROM derived
       WHERE {predicate}",
      predicate = where_clause.sql,
    );
    let (min_filed, max_filed, min_score, max_score, total): (
      Option<String>,
      Option<String>,
      Option<f64>,
      Option<f64>,
      i64,
    ) = self
      .query_one(sql, where_clause.params, |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
      })
      .await?;

    Ok(FilterMetadata {
      countries,
      agencies,
      min_filed: decode_opt_date(min_filed)?,
      max_filed: decode_opt_date(max_filed)?,
      min_score,
      max_score,
      total_eligible: u64::try_from(total).unwrap_or(0),
    })
  }

  async fn monthly_counts(&self, filter: &LawsuitFilter, group_by: GroupBy) -> Result<TimeSeries> {
    if rejected(filter) {
      return Ok(TimeSeries::empty(group_by));
    }
    let axis = month_axis(filter.dates.start, filter.dates.end);
    let where_clause = render(&filter.predicate());

    let Some(group_field) = group_by.field() else {
      let sql = format!(
        "{DERIVED}
         SELECT strftime('%Y-%m', filed_date) AS month, COUNT(*)
         FROM derived
         WHERE {predicate}
         GROUP BY month",
        predicate = where_clause.sql,
      );
      let rows: Vec<(String, i64)> = self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(where_clause.params), |row| {
              Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?;

      let counts = rows
        .into_iter()
        .map(|(month, count)| Ok((month.parse::<Month>()?, u64::try_from(count).unwrap_or(0))))
        .collect::<Result<Vec<_>>>()?;
      return Ok(fill_totals(&axis, counts));
    };

    let sql = format!(
      "{DERIVED}
       SELECT strftime('%Y-%m', filed_date) AS month, {group} AS grp, COUNT(*)
       FROM derived
       WHERE {predicate}
       GROUP BY month, grp",
      group = column(group_field),
      predicate = where_clause.sql,
    );
    let rows: Vec<(String, String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(where_clause.params), |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let counts = rows
      .into_iter()
      .map(|(month, group, count)| {
        Ok((month.parse::<Month>()?, group, u64::try_from(count).unwrap_or(0)))
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(fill_grouped(&axis, group_by, counts))
  }

  async fn count(&self, filter: &LawsuitFilter) -> Result<u64> {
    if rejected(filter) {
      return Ok(0);
    }
    let where_clause = render(&filter.predicate());
    let sql = format!(
      "{DERIVED} SELECT COUNT(*) FROM derived WHERE {predicate}",
      predicate = where_clause.sql,
    );
    let total: i64 = self.query_one(sql, where_clause.params, |row| row.get(0)).await?;
    Ok(u64::try_from(total).unwrap_or(0))
  }

  async fn fetch_page(
    &self,
    filter: &LawsuitFilter,
    request: PageRequest,
  ) -> Result<Page<LawsuitRecord>> {
    request.validate()?;
    if rejected(filter) {
      return Ok(Page::empty(request));
    }

    let total_count = self.count(filter).await?;
    request.check_in_range(total_count)?;

    let mut where_clause = render(&filter.predicate());
    let sql = format!(
      "{DERIVED}
       SELECT {columns} FROM derived
       WHERE {predicate}
       ORDER BY filed_utc DESC, id DESC
       LIMIT ? OFFSET ?",
      columns = RawLawsuit::COLUMNS,
      predicate = where_clause.sql,
    );
    where_clause
      .params
      .push(Value::Integer(i64::try_from(request.page_size).unwrap_or(i64::MAX)));
    where_clause
      .params
      .push(Value::Integer(i64::try_from(request.offset()).unwrap_or(i64::MAX)));

    let raws: Vec<RawLawsuit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(where_clause.params), RawLawsuit::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut rows = Vec::with_capacity(raws.len());
    for raw in raws {
      let id = raw.id;
      match raw.into_record() {
        Ok(record) => rows.push(record),
        Err(e) => warn!(lawsuit_id = id, error = %e, "skipping unreadable lawsuit row"),
      }
    }

    Ok(Page {
      page: request.page,
      page_size: request.page_size,
      total_count,
      last_page: last_page(total_count, request.page_size),
      rows,
    })
  }

  async fn summary(&self, filter: &LawsuitFilter) -> Result<SummaryStats> {
    if rejected(filter) {
      return Ok(SummaryStats::empty());
    }
    let where_clause = render(&filter.predicate());
    let sql = format!(
      "{DERIVED}
       SELECT COUNT(*), COUNT(DISTINCT country), MIN(filed_date), MAX(filed_date)
       FROM derived
       WHERE {predicate}",
      predicate = where_clause.sql,
    );
    let (total, countries, first, last): (i64, i64, Option<String>, Option<String>) = self
      .query_one(sql, where_clause.params, |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
      })
      .await?;

    Ok(SummaryStats::from_parts(
      u64::try_from(total).unwrap_or(0),
      u64::try_from(countries).unwrap_or(0),
      decode_opt_date(first)?,
      decode_opt_date(last)?,
    ))
  }
}
