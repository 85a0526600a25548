//! A [`LawsuitStore`] over a snapshot held in memory.
//!
//! The snapshot holds eligible records only; it is loaded once (for example
//! from the SQLite backend) and filtered with [`Predicate::matches`].

use std::{
  collections::{BTreeSet, HashMap},
  sync::Arc,
};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  filter::{GroupBy, LawsuitFilter, Predicate},
  lawsuit::LawsuitRecord,
  month::{Month, month_axis},
  page::{Page, PageRequest, last_page},
  series::{TimeSeries, fill_grouped, fill_totals},
  stats::{FilterMetadata, SummaryStats},
  store::LawsuitStore,
};

/// An immutable, shareable snapshot of eligible lawsuits.
///
/// Cloning is cheap; the records are reference-counted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  records: Arc<Vec<LawsuitRecord>>,
}

impl MemoryStore {
  pub fn new(records: Vec<LawsuitRecord>) -> Self {
    Self { records: Arc::new(records) }
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  fn matching(&self, predicate: &Predicate) -> impl Iterator<Item = &LawsuitRecord> {
    self.records.iter().filter(move |r| predicate.matches(r))
  }
}

impl LawsuitStore for MemoryStore {
  type Error = Error;

  async fn metadata(&self) -> Result<FilterMetadata> {
    let countries: BTreeSet<&str> = self.records.iter().map(|r| r.country.as_str()).collect();
    let agencies: BTreeSet<&str> = self.records.iter().map(|r| r.agency.as_str()).collect();
    let scores = self.records.iter().map(|r| r.score);

    Ok(FilterMetadata {
      countries:      countries.into_iter().map(str::to_owned).collect(),
      agencies:       agencies.into_iter().map(str::to_owned).collect(),
      min_filed:      self.records.iter().map(|r| r.filed_date).min(),
      max_filed:      self.records.iter().map(|r| r.filed_date).max(),
      min_score:      scores.clone().reduce(f64::min),
      max_score:      scores.reduce(f64::max),
      total_eligible: self.records.len() as u64,
    })
  }

  async fn monthly_counts(&self, filter: &LawsuitFilter, group_by: GroupBy) -> Result<TimeSeries> {
    if filter.validate().is_err() {
      return Ok(TimeSeries::empty(group_by));
    }
    let axis = month_axis(filter.dates.start, filter.dates.end);
    let predicate = filter.predicate();

    let series = match group_by {
      GroupBy::Ungrouped => {
        let mut counts: HashMap<Month, u64> = HashMap::new();
        for r in self.matching(&predicate) {
          *counts.entry(Month::of(r.filed_date)).or_default() += 1;
        }
        fill_totals(&axis, counts)
      }
      GroupBy::Country | GroupBy::Agency => {
        let mut counts: HashMap<(Month, String), u64> = HashMap::new();
        for r in self.matching(&predicate) {
          let group = match group_by {
            GroupBy::Agency => &r.agency,
            _ => &r.country,
          };
          *counts.entry((Month::of(r.filed_date), group.clone())).or_default() += 1;
        }
        fill_grouped(
          &axis,
          group_by,
          counts.into_iter().map(|((month, group), count)| (month, group, count)),
        )
      }
    };
    Ok(series)
  }

  async fn count(&self, filter: &LawsuitFilter) -> Result<u64> {
    if filter.validate().is_err() {
      return Ok(0);
    }
    Ok(self.matching(&filter.predicate()).count() as u64)
  }

  async fn fetch_page(
    &self,
    filter: &LawsuitFilter,
    request: PageRequest,
  ) -> Result<Page<LawsuitRecord>> {
    request.validate()?;
    if filter.validate().is_err() {
      return Ok(Page::empty(request));
    }

    let mut rows: Vec<&LawsuitRecord> = self.matching(&filter.predicate()).collect();
    let total_count = rows.len() as u64;
    request.check_in_range(total_count)?;

    rows.sort_by(|a, b| b.filed.cmp(&a.filed).then(b.id.cmp(&a.id)));
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size).unwrap_or(usize::MAX);

    Ok(Page {
      page: request.page,
      page_size: request.page_size,
      total_count,
      last_page: last_page(total_count, request.page_size),
      rows: rows.into_iter().skip(offset).take(take).cloned().collect(),
    })
  }

  async fn summary(&self, filter: &LawsuitFilter) -> Result<SummaryStats> {
    if filter.validate().is_err() {
      return Ok(SummaryStats::empty());
    }
    let predicate = filter.predicate();
    let mut total = 0u64;
    let mut countries = BTreeSet::new();
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;
    for r in self.matching(&predicate) {
      total += 1;
      countries.insert(r.country.as_str());
      first = Some(first.map_or(r.filed_date, |d| d.min(r.filed_date)));
      last = Some(last.map_or(r.filed_date, |d| d.max(r.filed_date)));
    }
    Ok(SummaryStats::from_parts(total, countries.len() as u64, first, last))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};

  use super::*;
  use crate::{lawsuit::GptSummary, store::fetch_all};

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn record(id: i64, filed: &str, country: &str, agency: &str) -> LawsuitRecord {
    let summary = GptSummary::decode(&format!(
      r#"{{"likely_country_of_origin":"{country}","221g_score":{id}}}"#
    ))
    .unwrap();
    LawsuitRecord::new(
      id,
      filed.parse::<DateTime<Utc>>().unwrap(),
      format!("Case {id}"),
      Some(agency.to_owned()),
      summary,
    )
  }

  fn store() -> MemoryStore {
    MemoryStore::new(vec![
      record(1, "2023-01-10T09:00:00Z", "Mexico", "USCIS"),
      record(2, "2023-01-20T09:00:00Z", "India", "DOS"),
      record(3, "2023-03-05T09:00:00Z", "Mexico", "DOS"),
      record(4, "2023-03-05T09:00:00Z", "Iran", "USCIS"),
      record(5, "2024-06-01T09:00:00Z", "India", "USCIS"),
    ])
  }

  fn q1() -> LawsuitFilter { LawsuitFilter::new(date(2023, 1, 1), date(2023, 3, 31)) }

  #[tokio::test]
  async fn ungrouped_series_zero_fills_february() {
    let series = store().monthly_counts(&q1(), GroupBy::Ungrouped).await.unwrap();
    let counts: Vec<u64> = series.points.iter().map(|p| p.count).collect();
    assert_eq!(counts, [2, 0, 2]);
    assert_eq!(series.total(), store().count(&q1()).await.unwrap());
  }

  #[tokio::test]
  async fn grouped_series_uses_only_filtered_categories() {
    let filter = q1().with_countries(["Mexico", "India"]);
    let series = store().monthly_counts(&filter, GroupBy::Country).await.unwrap();
    assert_eq!(series.groups(), ["India", "Mexico"]);
    assert_eq!(series.points.len(), 2 * 3);
    assert_eq!(series.total(), 3);
  }

  #[tokio::test]
  async fn pages_are_newest_first_with_id_tiebreak() {
    let page = store()
      .fetch_page(&q1(), PageRequest::new(1, 3).unwrap())
      .await
      .unwrap();
    let ids: Vec<i64> = page.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, [4, 3, 2]);
    assert_eq!(page.total_count, 4);
    assert_eq!(page.last_page, 2);

    let page2 = store()
      .fetch_page(&q1(), PageRequest::new(2, 3).unwrap())
      .await
      .unwrap();
    assert_eq!(page2.rows.iter().map(|r| r.id).collect::<Vec<_>>(), [1]);

    let err = store()
      .fetch_page(&q1(), PageRequest::new(3, 3).unwrap())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidPage { page: 3, last_page: 2 }));
  }

  #[tokio::test]
  async fn invalid_filter_yields_empty_results() {
    let inverted = LawsuitFilter::new(date(2023, 3, 1), date(2023, 1, 1));
    let s = store();
    assert!(s.monthly_counts(&inverted, GroupBy::Ungrouped).await.unwrap().points.is_empty());
    assert_eq!(s.count(&inverted).await.unwrap(), 0);
    let page = s.fetch_page(&inverted, PageRequest::new(1, 10).unwrap()).await.unwrap();
    assert!(page.rows.is_empty());
    assert_eq!(s.summary(&inverted).await.unwrap(), SummaryStats::empty());
  }

  #[tokio::test]
  async fn metadata_covers_whole_snapshot() {
    let meta = store().metadata().await.unwrap();
    assert_eq!(meta.countries, ["India", "Iran", "Mexico"]);
    assert_eq!(meta.agencies, ["DOS", "USCIS"]);
    assert_eq!(meta.min_filed, Some(date(2023, 1, 10)));
    assert_eq!(meta.max_filed, Some(date(2024, 6, 1)));
    assert_eq!(meta.min_score, Some(1.0));
    assert_eq!(meta.max_score, Some(5.0));
    assert_eq!(meta.total_eligible, 5);
  }

  #[tokio::test]
  async fn summary_and_fetch_all_agree() {
    let s = store();
    let summary = s.summary(&q1()).await.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.countries_involved, 3);
    assert_eq!(summary.first_filed, Some(date(2023, 1, 10)));
    assert_eq!(summary.last_filed, Some(date(2023, 3, 5)));

    let all = fetch_all(&s, &q1()).await.unwrap();
    assert_eq!(all.len() as u64, summary.total);
  }
}
