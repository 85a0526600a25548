//! The `LawsuitStore` trait.
//!
//! Implemented by the SQLite backend (`lawdash-store-sqlite`) and by the
//! in-memory [`MemoryStore`](crate::memory::MemoryStore). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  filter::{GroupBy, LawsuitFilter},
  lawsuit::LawsuitRecord,
  page::{Page, PageRequest},
  series::TimeSeries,
  stats::{FilterMetadata, SummaryStats},
};

/// Read-only access to the lawsuits relation.
///
/// Every operation is an idempotent read that depends only on its arguments.
/// A filter that fails [`LawsuitFilter::validate`] is never sent to the
/// underlying store; operations return their empty result instead.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait LawsuitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Distinct countries and agencies plus global date and score bounds over
  /// all eligible records.
  fn metadata(&self) -> impl Future<Output = Result<FilterMetadata, Self::Error>> + Send + '_;

  /// The zero-filled monthly series for `filter`, broken out by `group_by`.
  fn monthly_counts<'a>(
    &'a self,
    filter: &'a LawsuitFilter,
    group_by: GroupBy,
  ) -> impl Future<Output = Result<TimeSeries, Self::Error>> + Send + 'a;

  /// Number of records matching `filter`.
  fn count<'a>(
    &'a self,
    filter: &'a LawsuitFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// One page of matching records, newest filing first, ties broken by
  /// descending id.
  ///
  /// Fails with [`Error::InvalidPage`](crate::Error::InvalidPage) when the
  /// page lies beyond the last page.
  fn fetch_page<'a>(
    &'a self,
    filter: &'a LawsuitFilter,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<LawsuitRecord>, Self::Error>> + Send + 'a;

  /// Headline statistics for `filter`.
  fn summary<'a>(
    &'a self,
    filter: &'a LawsuitFilter,
  ) -> impl Future<Output = Result<SummaryStats, Self::Error>> + Send + 'a;
}

/// Every record matching `filter`, in page order.
///
/// Composes [`LawsuitStore::count`] with a single page sized to hold them all.
pub async fn fetch_all<S: LawsuitStore>(
  store: &S,
  filter: &LawsuitFilter,
) -> Result<Vec<LawsuitRecord>, S::Error> {
  let total = store.count(filter).await?;
  let request = PageRequest { page: 1, page_size: total.max(1) };
  Ok(store.fetch_page(filter, request).await?.rows)
}
