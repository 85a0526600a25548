//! Error types for `lawdash-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Inverted date range, inverted score range, or non-finite score bounds.
  #[error("invalid filter: {0}")]
  InvalidFilter(String),

  /// A page number or page size of zero.
  #[error("invalid page request: {0}")]
  InvalidPageRequest(String),

  #[error("page {page} is out of range (last page is {last_page})")]
  InvalidPage { page: u64, last_page: u64 },

  /// A semi-structured document that is not a JSON object.
  #[error("malformed document: {0}")]
  MalformedDocument(String),

  #[error("invalid month {0:?}; expected YYYY-MM")]
  InvalidMonth(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
