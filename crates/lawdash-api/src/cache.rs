//! Time-bounded cache for [`FilterMetadata`].
//!
//! Filter widgets are populated on every page load, but the underlying
//! distinct-value scans only change when the data does. A zero TTL disables
//! caching.

use std::{
  future::Future,
  time::{Duration, Instant},
};

use lawdash_core::stats::FilterMetadata;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
pub struct MetadataCache {
  ttl:   Duration,
  entry: RwLock<Option<(Instant, FilterMetadata)>>,
}

impl MetadataCache {
  pub fn new(ttl: Duration) -> Self { Self { ttl, entry: RwLock::new(None) } }

  /// Return the cached value if it is fresh, otherwise run `load` and cache
  /// its result. Errors are never cached.
  pub async fn get_or_load<F, Fut, E>(&self, load: F) -> Result<FilterMetadata, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<FilterMetadata, E>>,
  {
    if let Some((loaded_at, metadata)) = self.entry.read().await.as_ref()
      && loaded_at.elapsed() < self.ttl
    {
      return Ok(metadata.clone());
    }

    let metadata = load().await?;
    if !self.ttl.is_zero() {
      *self.entry.write().await = Some((Instant::now(), metadata.clone()));
      debug!(ttl_secs = self.ttl.as_secs(), "filter metadata cached");
    }
    Ok(metadata)
  }

  pub async fn invalidate(&self) { *self.entry.write().await = None; }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU64, Ordering};

  use super::*;

  fn metadata(total: u64) -> FilterMetadata {
    FilterMetadata {
      countries:      vec![],
      agencies:       vec![],
      min_filed:      None,
      max_filed:      None,
      min_score:      None,
      max_score:      None,
      total_eligible: total,
    }
  }

  async fn load(calls: &AtomicU64) -> Result<FilterMetadata, std::convert::Infallible> {
    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
    Ok(metadata(n))
  }

  #[tokio::test]
  async fn fresh_entries_are_reused_until_invalidated() {
    let cache = MetadataCache::new(Duration::from_secs(300));
    let calls = AtomicU64::new(0);

    assert_eq!(cache.get_or_load(|| load(&calls)).await.unwrap().total_eligible, 1);
    assert_eq!(cache.get_or_load(|| load(&calls)).await.unwrap().total_eligible, 1);

    cache.invalidate().await;
    assert_eq!(cache.get_or_load(|| load(&calls)).await.unwrap().total_eligible, 2);
  }

  #[tokio::test]
  async fn zero_ttl_always_reloads() {
    let cache = MetadataCache::new(Duration::ZERO);
    let calls = AtomicU64::new(0);
    cache.get_or_load(|| load(&calls)).await.unwrap();
    cache.get_or_load(|| load(&calls)).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn errors_are_not_cached() {
    let cache = MetadataCache::new(Duration::from_secs(300));
    let failed: Result<FilterMetadata, &str> = cache.get_or_load(|| async { Err("down") }).await;
    assert!(failed.is_err());
    let ok: Result<FilterMetadata, &str> = cache.get_or_load(|| async { Ok(metadata(7)) }).await;
    assert_eq!(ok.unwrap().total_eligible, 7);
  }
}
