//! Resource service: async CRUD over a record store behind a simulated
//! network round trip.
//!
//! Failures are returned as [`ServiceError`] and logged here, at the
//! boundary. Callers decide what a `NotFound` or a `Transient` failure means
//! for them.

mod error;
mod network;

pub use error::ServiceError;
pub use network::{CallStats, Operation, SimulatedNetwork};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::records::{Record, RecordStore};

pub struct ResourceService<R: Record> {
  /// FIFO-fair, so mutations apply in the order they were issued
  store: Mutex<RecordStore<R>>,
  network: SimulatedNetwork,
  stats: CallStats,
}

impl<R: Record> ResourceService<R> {
  pub fn new(records: Vec<R>, network: SimulatedNetwork) -> Self {
    Self {
      store: Mutex::new(RecordStore::new(records)),
      network,
      stats: CallStats::default(),
    }
  }

  /// Snapshot of every record, in store order.
  pub async fn list(&self) -> Result<Vec<R>, ServiceError> {
    self.stats.record(Operation::List);
    self.round_trip(Operation::List, None).await?;

    let records = self.store.lock().await.snapshot();
    debug!(resource = R::resource(), count = records.len(), "listed records");
    Ok(records)
  }

  /// The record with `id`, or `None` if there is none.
  pub async fn get(&self, id: i64) -> Result<Option<R>, ServiceError> {
    self.stats.record(Operation::Get);
    self.round_trip(Operation::Get, Some(id)).await?;

    let record = self.store.lock().await.find(id).cloned();
    debug!(resource = R::resource(), id, found = record.is_some(), "fetched record");
    Ok(record)
  }

  /// Shallow-merge `patch` into the record with `id`, returning the result.
  pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R, ServiceError> {
    self.stats.record(Operation::Update);
    let mut store = self.store.lock().await;
    self.round_trip(Operation::Update, Some(id)).await?;

    match store.update(id, &patch) {
      Some(updated) => {
        info!(resource = R::resource(), id, "record updated");
        Ok(updated)
      }
      None => Err(self.not_found(Operation::Update, id)),
    }
  }

  /// Remove the record with `id`, returning it.
  pub async fn delete(&self, id: i64) -> Result<R, ServiceError> {
    self.stats.record(Operation::Delete);
    let mut store = self.store.lock().await;
    self.round_trip(Operation::Delete, Some(id)).await?;

    match store.remove(id) {
      Some(removed) => {
        info!(resource = R::resource(), id, remaining = store.len(), "record deleted");
        Ok(removed)
      }
      None => Err(self.not_found(Operation::Delete, id)),
    }
  }

  /// Number of times `op` has been invoked.
  pub fn calls(&self, op: Operation) -> u64 {
    self.stats.get(op)
  }

  /// Invocations of every operation.
  pub fn total_calls(&self) -> u64 {
    self.stats.total()
  }

  async fn round_trip(&self, op: Operation, id: Option<i64>) -> Result<(), ServiceError> {
    self.network.round_trip(op).await.map_err(|reason| {
      warn!(resource = R::resource(), %op, ?id, %reason, "service call failed");
      ServiceError::Transient {
        resource: R::resource(),
        op,
        reason,
      }
    })
  }

  fn not_found(&self, op: Operation, id: i64) -> ServiceError {
    warn!(resource = R::resource(), %op, id, "record not found");
    ServiceError::NotFound {
      resource: R::resource(),
      id,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::records::{Demo, DemoPatch, User, UserPatch};
  use chrono::NaiveDate;
  use std::time::Duration;

  fn demos(ids: std::ops::RangeInclusive<i64>) -> Vec<Demo> {
    ids
      .map(|id| Demo {
        id,
        name: format!("Demo {}", id),
        date: NaiveDate::from_ymd_opt(2024, 2, id as u32).unwrap(),
      })
      .collect()
  }

  fn users() -> Vec<User> {
    vec![
      User {
        id: 1,
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        avatar_url: None,
        role: Some("Admiral".to_string()),
      },
      User {
        id: 2,
        name: "Alan".to_string(),
        email: "alan@example.com".to_string(),
        avatar_url: None,
        role: None,
      },
    ]
  }

  #[tokio::test]
  async fn test_get_present_and_absent() {
    let service = ResourceService::new(demos(1..=5), SimulatedNetwork::instant());

    for id in 1..=5 {
      let demo = service.get(id).await.unwrap().unwrap();
      assert_eq!(demo.id, id);
    }
    assert_eq!(service.get(6).await.unwrap(), None);
  }

  #[tokio::test]
  async fn test_update_overlays_patch() {
    let service = ResourceService::new(users(), SimulatedNetwork::instant());
    let before = service.get(1).await.unwrap().unwrap();

    let updated = service.update(1, UserPatch::name("Rear Admiral Hopper")).await.unwrap();

    let expected = User {
      name: "Rear Admiral Hopper".to_string(),
      ..before
    };
    assert_eq!(updated, expected);
    assert_eq!(service.get(1).await.unwrap(), Some(expected));
  }

  #[tokio::test]
  async fn test_update_missing_user_leaves_list_unchanged() {
    let service = ResourceService::new(users(), SimulatedNetwork::instant());
    let before = service.list().await.unwrap();

    let err = service.update(999, UserPatch::name("X")).await.unwrap_err();

    assert_eq!(
      err,
      ServiceError::NotFound {
        resource: "users",
        id: 999
      }
    );
    assert_eq!(service.list().await.unwrap(), before);
  }

  #[tokio::test]
  async fn test_delete_demo_three() {
    let service = ResourceService::new(demos(1..=5), SimulatedNetwork::instant());

    let removed = service.delete(3).await.unwrap();
    assert_eq!(removed.id, 3);

    let remaining = service.list().await.unwrap();
    assert_eq!(remaining.len(), 4);
    assert!(remaining.iter().all(|d| d.id != 3));
  }

  #[tokio::test]
  async fn test_delete_missing_is_not_found() {
    let service = ResourceService::new(demos(1..=5), SimulatedNetwork::instant());

    let err = service.delete(42).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(service.list().await.unwrap(), demos(1..=5));
  }

  #[tokio::test]
  async fn test_list_is_idempotent() {
    let service = ResourceService::new(demos(1..=5), SimulatedNetwork::instant());
    let first = service.list().await.unwrap();
    let second = service.list().await.unwrap();
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_transient_failure_does_not_touch_store() {
    let network = SimulatedNetwork::instant().with_fail_every(1);
    let service = ResourceService::new(demos(1..=5), network);

    let err = service.delete(3).await.unwrap_err();
    assert!(err.is_transient());
    assert!(service.list().await.is_err());
    assert_eq!(service.store.lock().await.len(), 5);
  }

  #[tokio::test(start_paused = true)]
  async fn test_updates_apply_in_issue_order() {
    let network = SimulatedNetwork::new(Duration::from_millis(300), Duration::from_millis(200));
    let service = ResourceService::new(demos(1..=5), network);

    let (first, second) = tokio::join!(
      service.update(2, DemoPatch::name("first")),
      service.update(2, DemoPatch::name("second")),
    );
    assert_eq!(first.unwrap().name, "first");
    assert_eq!(second.unwrap().name, "second");
    assert_eq!(service.get(2).await.unwrap().unwrap().name, "second");
  }

  #[tokio::test]
  async fn test_calls_are_counted() {
    let service = ResourceService::new(demos(1..=2), SimulatedNetwork::instant());
    service.list().await.unwrap();
    service.list().await.unwrap();
    let _ = service.delete(9).await;

    assert_eq!(service.calls(Operation::List), 2);
    assert_eq!(service.calls(Operation::Delete), 1);
    assert_eq!(service.calls(Operation::Get), 0);
    assert_eq!(service.total_calls(), 3);
  }
}
