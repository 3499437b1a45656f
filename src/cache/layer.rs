//! Cache layer that orchestrates freshness, coalescing and invalidation
//! around an async fetcher.

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::types::{CacheResult, QueryKey, QuerySnapshot, QueryStatus};
use crate::service::ServiceError;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, ServiceError>>>;

/// Weak so that a fetch whose readers were all dropped is dropped with them,
/// releasing whatever it was waiting on.
struct InFlight<T> {
  id: u64,
  future: WeakShared<BoxFuture<'static, Result<T, ServiceError>>>,
}

impl<T> InFlight<T> {
  fn upgrade(&self) -> Option<SharedFetch<T>> {
    self.future.upgrade()
  }
}

struct Entry<T> {
  data: Option<T>,
  error: Option<ServiceError>,
  /// When `data` was last replaced by a successful fetch
  updated_at: Option<Instant>,
  invalidated: bool,
  in_flight: Option<InFlight<T>>,
}

impl<T> Default for Entry<T> {
  fn default() -> Self {
    Self {
      data: None,
      error: None,
      updated_at: None,
      invalidated: false,
      in_flight: None,
    }
  }
}

impl<T: Clone> Entry<T> {
  /// Forget an in-flight fetch that no reader is awaiting anymore
  fn reap(&mut self, key: QueryKey) {
    if let Some(in_flight) = &self.in_flight {
      if in_flight.upgrade().is_none() {
        debug!(%key, fetch_id = in_flight.id, "in-flight fetch abandoned by its readers");
        self.in_flight = None;
      }
    }
  }

  fn is_fetching(&self) -> bool {
    self.in_flight.as_ref().is_some_and(|f| f.upgrade().is_some())
  }

  fn status(&self) -> QueryStatus {
    if self.is_fetching() {
      QueryStatus::Pending
    } else if self.error.is_some() {
      QueryStatus::Error
    } else if self.data.is_some() {
      QueryStatus::Success
    } else {
      QueryStatus::Pending
    }
  }

  fn is_stale(&self, stale_time: Duration) -> bool {
    self.invalidated
      || self
        .updated_at
        .map(|t| t.elapsed() >= stale_time)
        .unwrap_or(true)
  }

  /// Data that may be served without fetching
  fn fresh_data(&self, stale_time: Duration) -> Option<&T> {
    if self.error.is_some() || self.is_stale(stale_time) {
      return None;
    }
    self.data.as_ref()
  }

  fn snapshot(&self, stale_time: Duration) -> QuerySnapshot<T> {
    QuerySnapshot {
      data: self.data.clone(),
      status: self.status(),
      error: self.error.clone(),
      is_fetching: self.is_fetching(),
      is_stale: self.is_stale(stale_time),
    }
  }
}

/// Query cache for one data type.
///
/// Only one entry exists per key. An entry is created on its first read and
/// its data is replaced, never merged, on every successful fetch.
pub struct QueryCache<T> {
  entries: Mutex<HashMap<QueryKey, Entry<T>>>,
  /// How long before cached data is considered stale
  stale_time: Duration,
  next_fetch_id: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> {
  pub fn new(stale_time: Duration) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      stale_time,
      next_fetch_id: AtomicU64::new(1),
    }
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry<T>>> {
    // Entries are plain data and every critical section leaves them
    // consistent, so a poisoned lock is still usable.
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Read `key`, fetching with `fetcher` when the entry is missing, stale or
  /// invalidated.
  ///
  /// 1. Fresh entry: return its data, the fetcher is not called
  /// 2. Fetch in flight: join it
  /// 3. Otherwise: start a fetch; previous data stays visible meanwhile
  ///
  /// The entry is updated by the first reader to observe the fetch settle.
  /// If every reader is dropped first the fetch itself is dropped, and if
  /// the key is invalidated in the meantime its result is discarded.
  pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<CacheResult<T>, ServiceError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>> + Send + 'static,
  {
    let (fetch_id, future, joined) = {
      let mut entries = self.lock();
      let entry = entries.entry(key).or_default();
      entry.reap(key);

      if let Some(data) = entry.fresh_data(self.stale_time) {
        debug!(%key, "cache hit");
        return Ok(CacheResult::from_cache(data.clone()));
      }

      let joinable = entry
        .in_flight
        .as_ref()
        .and_then(|in_flight| Some((in_flight.id, in_flight.upgrade()?)));

      match joinable {
        Some((id, future)) => {
          debug!(%key, fetch_id = id, "joining in-flight fetch");
          (id, future, true)
        }
        None => {
          let id = self.next_fetch_id.fetch_add(1, Ordering::SeqCst);
          let future = fetcher().boxed().shared();
          debug!(%key, fetch_id = id, "starting fetch");
          // Only `None` once the future has completed, which it cannot
          // have done before its first poll
          entry.in_flight = future.downgrade().map(|weak| InFlight { id, future: weak });
          (id, future, false)
        }
      }
    };

    let result = future.await;
    self.settle(key, fetch_id, &result);

    result.map(|data| {
      if joined {
        CacheResult::coalesced(data)
      } else {
        CacheResult::from_network(data)
      }
    })
  }

  /// Record the outcome of fetch `fetch_id` if it is still the entry's
  /// current fetch.
  fn settle(&self, key: QueryKey, fetch_id: u64, result: &Result<T, ServiceError>) {
    let mut entries = self.lock();
    let Some(entry) = entries.get_mut(&key) else {
      return;
    };

    let current = entry
      .in_flight
      .as_ref()
      .is_some_and(|in_flight| in_flight.id == fetch_id);
    if !current {
      // Already settled by another reader, or superseded by invalidation
      return;
    }

    entry.in_flight = None;
    match result {
      Ok(data) => {
        entry.data = Some(data.clone());
        entry.error = None;
        entry.updated_at = Some(Instant::now());
        entry.invalidated = false;
        debug!(%key, fetch_id, "fetch settled");
      }
      Err(e) => {
        entry.error = Some(e.clone());
        debug!(%key, fetch_id, error = %e, "fetch failed, keeping previous data");
      }
    }
  }

  /// Current state of `key`, without fetching.
  pub fn snapshot(&self, key: QueryKey) -> QuerySnapshot<T> {
    self
      .lock()
      .get(&key)
      .map(|entry| entry.snapshot(self.stale_time))
      .unwrap_or_else(QuerySnapshot::empty)
  }

  /// Mark `key` stale so the next read refetches. An in-flight fetch for the
  /// key is abandoned and its result will not be stored.
  pub fn invalidate(&self, key: QueryKey) {
    if let Some(entry) = self.lock().get_mut(&key) {
      Self::invalidate_entry(key, entry);
    }
  }

  /// Invalidate every key of `resource` (the collection and all items).
  pub fn invalidate_resource(&self, resource: &str) {
    let mut entries = self.lock();
    for (key, entry) in entries.iter_mut().filter(|(k, _)| k.resource == resource) {
      Self::invalidate_entry(*key, entry);
    }
  }

  /// A forced refetch supersedes the last failure, so the error is cleared
  /// and observers that hold off retrying errors fetch again.
  fn invalidate_entry(key: QueryKey, entry: &mut Entry<T>) {
    entry.invalidated = true;
    entry.error = None;
    if let Some(in_flight) = entry.in_flight.take() {
      debug!(%key, fetch_id = in_flight.id, "invalidated, abandoning in-flight fetch");
    } else {
      debug!(%key, "invalidated");
    }
  }
}
