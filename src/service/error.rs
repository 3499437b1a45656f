use super::network::Operation;

/// Failure of a resource service call.
///
/// `Clone` because a single fetch result is shared by every coalesced reader
/// and kept in the cache entry for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
  /// No record carries the identifier
  #[error("{resource} {id} not found")]
  NotFound { resource: &'static str, id: i64 },
  /// The call itself failed; the store was not touched
  #[error("{op} {resource} failed: {reason}")]
  Transient {
    resource: &'static str,
    op: Operation,
    reason: String,
  },
}

impl ServiceError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }

  pub fn is_transient(&self) -> bool {
    matches!(self, Self::Transient { .. })
  }
}
