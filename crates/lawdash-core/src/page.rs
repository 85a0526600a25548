//! Pagination over the filtered, sorted lawsuit set.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A 1-based page number and a page size. Both must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page:      u64,
  pub page_size: u64,
}

impl PageRequest {
  pub fn new(page: u64, page_size: u64) -> Result<Self> {
    let request = Self { page, page_size };
    request.validate()?;
    Ok(request)
  }

  pub fn validate(&self) -> Result<()> {
    if self.page == 0 {
      return Err(Error::InvalidPageRequest("pages are numbered from 1".into()));
    }
    if self.page_size == 0 {
      return Err(Error::InvalidPageRequest("page size must be positive".into()));
    }
    Ok(())
  }

  /// Rows skipped before this page: `(page - 1) * page_size`.
  pub fn offset(&self) -> u64 {
    self.page.saturating_sub(1).saturating_mul(self.page_size)
  }

  /// Fail with [`Error::InvalidPage`] when no rows can exist on this page.
  ///
  /// Page 1 is always in range, even for an empty result.
  pub fn check_in_range(&self, total_count: u64) -> Result<()> {
    let last_page = last_page(total_count, self.page_size);
    if self.page > last_page {
      return Err(Error::InvalidPage { page: self.page, last_page });
    }
    Ok(())
  }
}

/// `max(1, ceil(total_count / page_size))`.
pub fn last_page(total_count: u64, page_size: u64) -> u64 {
  if page_size == 0 {
    return 1;
  }
  total_count.div_ceil(page_size).max(1)
}

/// One page of rows plus the bounds needed to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub page:        u64,
  pub page_size:   u64,
  /// Rows matching the filter across all pages.
  pub total_count: u64,
  pub last_page:   u64,
  pub rows:        Vec<T>,
}

impl<T> Page<T> {
  /// The page returned for a filter that cannot match.
  pub fn empty(request: PageRequest) -> Self {
    Self {
      page:        request.page,
      page_size:   request.page_size,
      total_count: 0,
      last_page:   1,
      rows:        Vec::new(),
    }
  }

  pub fn has_next(&self) -> bool { self.page < self.last_page }

  pub fn has_previous(&self) -> bool { self.page > 1 }
}
