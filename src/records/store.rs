use super::types::Record;

/// In-memory ordered collection of records of one variant.
///
/// Identifier uniqueness is assumed, not enforced: lookups act on the first
/// record carrying the identifier.
#[derive(Debug, Clone, Default)]
pub struct RecordStore<R> {
  records: Vec<R>,
}

impl<R: Record> RecordStore<R> {
  pub fn new(records: Vec<R>) -> Self {
    Self { records }
  }

  /// Copy of the current contents in store order
  pub fn snapshot(&self) -> Vec<R> {
    self.records.clone()
  }

  pub fn find(&self, id: i64) -> Option<&R> {
    self.records.iter().find(|r| r.id() == id)
  }

  /// Merge `patch` into the record with `id` in place.
  /// Returns the merged record, or `None` if no record has that id.
  pub fn update(&mut self, id: i64, patch: &R::Patch) -> Option<R> {
    let record = self.records.iter_mut().find(|r| r.id() == id)?;
    record.apply(patch);
    Some(record.clone())
  }

  /// Remove the record with `id`, returning it.
  pub fn remove(&mut self, id: i64) -> Option<R> {
    let index = self.records.iter().position(|r| r.id() == id)?;
    Some(self.records.remove(index))
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::records::{Demo, DemoPatch};
  use chrono::NaiveDate;

  fn store() -> RecordStore<Demo> {
    RecordStore::new(
      (1..=5)
        .map(|id| Demo {
          id,
          name: format!("Demo {}", id),
          date: NaiveDate::from_ymd_opt(2024, 1, id as u32).unwrap(),
        })
        .collect(),
    )
  }

  #[test]
  fn test_update_missing_leaves_store_unchanged() {
    let mut store = store();
    let before = store.snapshot();
    assert!(store.update(42, &DemoPatch::name("x")).is_none());
    assert_eq!(store.snapshot(), before);
  }

  #[test]
  fn test_remove_preserves_order_of_remaining() {
    let mut store = store();
    let removed = store.remove(3).unwrap();
    assert_eq!(removed.id, 3);
    let ids: Vec<i64> = store.snapshot().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2, 4, 5]);
    assert!(store.remove(3).is_none());
    assert_eq!(store.len(), 4);
  }
}
