//! Keys, statuses and snapshots for the query cache.

use std::fmt;

use crate::service::ServiceError;

/// Identifies a cached query: a whole collection ("users") or a single
/// item of a resource ("user:3").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
  pub resource: &'static str,
  pub id: Option<i64>,
}

impl QueryKey {
  pub const fn collection(resource: &'static str) -> Self {
    Self { resource, id: None }
  }

  pub const fn item(resource: &'static str, id: i64) -> Self {
    Self {
      resource,
      id: Some(id),
    }
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.id {
      Some(id) => write!(f, "{}:{}", self.resource, id),
      None => f.write_str(self.resource),
    }
  }
}

/// Lifecycle status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
  /// A fetch is in flight, or nothing has been fetched yet
  Pending,
  /// The most recent fetch failed
  Error,
  /// The most recent fetch succeeded
  Success,
}

/// Point-in-time view of a cache entry, for rendering.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
  /// Last successfully fetched data, kept across refetches and failures
  pub data: Option<T>,
  pub status: QueryStatus,
  /// Error of the most recent fetch, if it failed
  pub error: Option<ServiceError>,
  pub is_fetching: bool,
  /// Older than the staleness window, invalidated, or never fetched
  pub is_stale: bool,
}

impl<T> QuerySnapshot<T> {
  pub fn empty() -> Self {
    Self {
      data: None,
      status: QueryStatus::Pending,
      error: None,
      is_fetching: false,
      is_stale: true,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.status == QueryStatus::Pending
  }

  pub fn is_error(&self) -> bool {
    self.status == QueryStatus::Error
  }

  pub fn is_success(&self) -> bool {
    self.status == QueryStatus::Success
  }
}

/// Result from a cache read, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  pub fn coalesced(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Coalesced,
    }
  }

  pub fn from_cache(data: T) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
    }
  }
}

/// Indicates where a cache read got its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// This read started the fetch
  Network,
  /// This read joined a fetch another reader had started
  Coalesced,
  /// Served from a fresh entry without fetching
  CacheFresh,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_query_key_display() {
    assert_eq!(QueryKey::collection("users").to_string(), "users");
    assert_eq!(QueryKey::item("demo", 3).to_string(), "demo:3");
  }

  #[test]
  fn test_empty_snapshot_is_pending_and_stale() {
    let snapshot: QuerySnapshot<Vec<u8>> = QuerySnapshot::empty();
    assert!(snapshot.is_pending());
    assert!(snapshot.is_stale);
    assert!(!snapshot.is_fetching);
  }
}
