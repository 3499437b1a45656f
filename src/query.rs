//! View-side handles for observing cached queries and running mutations.
//!
//! Views render synchronously on every tick, while data arrives
//! asynchronously. [`Query<T>`] bridges the two: it reads the current
//! snapshot of a [`QuerySource`] and keeps a background fetch running
//! whenever the source is stale. Dropping the query (the view went away)
//! aborts its fetch, so nothing is written on its behalf.
//!
//! # Example
//!
//! ```ignore
//! let mut query = Query::new(providers.users.list_source());
//!
//! // In event loop tick
//! query.poll();
//!
//! // In render
//! let snapshot = query.snapshot();
//! match snapshot.status {
//!     QueryStatus::Pending if snapshot.data.is_none() => render_spinner(),
//!     QueryStatus::Error => render_error(snapshot.error),
//!     _ => render_data(snapshot.data),
//! }
//! ```

use std::future::Future;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::QuerySnapshot;
use crate::provider::QuerySource;
use crate::service::ServiceError;

/// Observer of one cached query.
pub struct Query<T> {
  source: Box<dyn QuerySource<T>>,
  task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Query<T> {
  pub fn new(source: impl QuerySource<T>) -> Self {
    Self {
      source: Box::new(source),
      task: None,
    }
  }

  /// Current state of the underlying cache entry.
  pub fn snapshot(&self) -> QuerySnapshot<T> {
    self.source.snapshot()
  }

  /// Whether this query has a fetch running.
  pub fn is_fetching(&self) -> bool {
    self.task.as_ref().is_some_and(|task| !task.is_finished())
  }

  /// Read through the cache in the background unless a fetch is already
  /// running. A fresh entry settles immediately without a network call.
  pub fn fetch(&mut self) {
    if self.is_fetching() {
      return;
    }
    self.start_fetch();
  }

  /// Invalidate the entry and fetch again, dropping any pending fetch.
  pub fn refetch(&mut self) {
    self.cancel();
    self.source.invalidate();
    self.start_fetch();
  }

  /// Call on every tick. Reaps a finished fetch and starts a new one when
  /// the entry has gone stale (expired or invalidated by a mutation).
  ///
  /// Returns `true` if a fetch settled since the last poll.
  pub fn poll(&mut self) -> bool {
    let settled = self.task.as_ref().is_some_and(|task| task.is_finished());
    if settled {
      self.task = None;
    }

    if self.task.is_none() {
      let snapshot = self.source.snapshot();
      // A failed fetch is retried only on request, not on every tick.
      // Invalidation clears the error, so a mutation still forces a refetch.
      if snapshot.is_stale && !snapshot.is_error() {
        self.start_fetch();
      }
    }

    settled
  }

  fn start_fetch(&mut self) {
    let future = self.source.fetch();
    self.task = Some(tokio::spawn(async move {
      // Outcome is read back from the cache entry
      if let Err(e) = future.await {
        debug!(error = %e, "background fetch failed");
      }
    }));
  }

  fn cancel(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl<T> Drop for Query<T> {
  fn drop(&mut self) {
    if let Some(task) = self.task.take() {
      task.abort();
    }
  }
}

impl<T> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("fetching", &self.task.is_some())
      .finish_non_exhaustive()
  }
}

/// One call site's mutation: at most one in flight at a time.
///
/// Unlike fetches, a started mutation always runs to settlement even if the
/// handle is dropped, so the cache is invalidated either way.
pub struct Mutation<T> {
  receiver: Option<oneshot::Receiver<Result<T, ServiceError>>>,
}

impl<T> Default for Mutation<T> {
  fn default() -> Self {
    Self { receiver: None }
  }
}

impl<T: Send + 'static> Mutation<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_pending(&self) -> bool {
    self.receiver.is_some()
  }

  /// Start `operation`. Ignored (returns `false`) while a previous one is
  /// still pending.
  pub fn mutate<Fut>(&mut self, operation: Fut) -> bool
  where
    Fut: Future<Output = Result<T, ServiceError>> + Send + 'static,
  {
    if self.is_pending() {
      return false;
    }

    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    tokio::spawn(async move {
      // Receiver may have been dropped
      let _ = tx.send(operation.await);
    });
    true
  }

  /// The outcome, once, when the mutation has settled.
  pub fn poll(&mut self) -> Option<Result<T, ServiceError>> {
    let receiver = self.receiver.as_mut()?;
    match receiver.try_recv() {
      Ok(result) => {
        self.receiver = None;
        Some(result)
      }
      Err(oneshot::error::TryRecvError::Empty) => None,
      Err(oneshot::error::TryRecvError::Closed) => {
        self.receiver = None;
        None
      }
    }
  }
}
