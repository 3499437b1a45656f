//! Simulated network round trip: fixed latency plus optional fault injection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::NetworkConfig;

/// Service operation, used for latency selection, stats and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
  List,
  Get,
  Update,
  Delete,
}

impl Operation {
  pub const ALL: [Operation; 4] = [
    Operation::List,
    Operation::Get,
    Operation::Update,
    Operation::Delete,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Operation::List => "list",
      Operation::Get => "get",
      Operation::Update => "update",
      Operation::Delete => "delete",
    }
  }

  fn index(&self) -> usize {
    match self {
      Operation::List => 0,
      Operation::Get => 1,
      Operation::Update => 2,
      Operation::Delete => 3,
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Stand-in for the network between a client and its backend.
#[derive(Debug)]
pub struct SimulatedNetwork {
  list_latency: Duration,
  item_latency: Duration,
  /// Every n-th round trip fails
  fail_every: Option<u64>,
  round_trips: AtomicU64,
}

impl SimulatedNetwork {
  pub fn new(list_latency: Duration, item_latency: Duration) -> Self {
    Self {
      list_latency,
      item_latency,
      fail_every: None,
      round_trips: AtomicU64::new(0),
    }
  }

  /// No latency, no faults
  pub fn instant() -> Self {
    Self::new(Duration::ZERO, Duration::ZERO)
  }

  pub fn from_config(config: &NetworkConfig) -> Self {
    Self::new(
      Duration::from_millis(config.list_latency_ms),
      Duration::from_millis(config.item_latency_ms),
    )
    .with_fail_every(config.fail_every.unwrap_or(0))
  }

  /// Make every `n`-th round trip fail. Zero disables fault injection.
  pub fn with_fail_every(mut self, n: u64) -> Self {
    self.fail_every = (n > 0).then_some(n);
    self
  }

  pub fn latency(&self, op: Operation) -> Duration {
    match op {
      Operation::List => self.list_latency,
      Operation::Get | Operation::Update | Operation::Delete => self.item_latency,
    }
  }

  /// Wait out the latency of `op`, then report whether the trip failed.
  pub async fn round_trip(&self, op: Operation) -> Result<(), String> {
    let latency = self.latency(op);
    if !latency.is_zero() {
      tokio::time::sleep(latency).await;
    }

    let trip = self.round_trips.fetch_add(1, Ordering::SeqCst) + 1;
    match self.fail_every {
      Some(n) if trip % n == 0 => Err(format!("simulated network failure (round trip {})", trip)),
      _ => Ok(()),
    }
  }
}

/// Per-operation invocation counters
#[derive(Debug, Default)]
pub struct CallStats {
  counts: [AtomicU64; 4],
}

impl CallStats {
  pub fn record(&self, op: Operation) {
    self.counts[op.index()].fetch_add(1, Ordering::SeqCst);
  }

  pub fn get(&self, op: Operation) -> u64 {
    self.counts[op.index()].load(Ordering::SeqCst)
  }

  pub fn total(&self) -> u64 {
    Operation::ALL.iter().map(|op| self.get(*op)).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_fail_every_fails_each_nth_trip() {
    let network = SimulatedNetwork::instant().with_fail_every(3);
    let results: Vec<bool> = futures::future::join_all(
      (0..6).map(|_| network.round_trip(Operation::Get)),
    )
    .await
    .into_iter()
    .map(|r| r.is_ok())
    .collect();

    assert_eq!(results, vec![true, true, false, true, true, false]);
  }

  #[tokio::test(start_paused = true)]
  async fn test_latency_by_operation() {
    let network = SimulatedNetwork::new(Duration::from_millis(500), Duration::from_millis(300));
    assert_eq!(network.latency(Operation::List), Duration::from_millis(500));
    assert_eq!(network.latency(Operation::Delete), Duration::from_millis(300));

    let start = tokio::time::Instant::now();
    network.round_trip(Operation::List).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(500));
  }

  #[test]
  fn test_zero_disables_faults() {
    let network = SimulatedNetwork::instant().with_fail_every(0);
    assert!(network.fail_every.is_none());
  }

  #[test]
  fn test_call_stats() {
    let stats = CallStats::default();
    stats.record(Operation::List);
    stats.record(Operation::List);
    stats.record(Operation::Delete);
    assert_eq!(stats.get(Operation::List), 2);
    assert_eq!(stats.get(Operation::Update), 0);
    assert_eq!(stats.total(), 3);
  }
}
