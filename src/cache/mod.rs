//! In-memory query cache with stale-while-revalidate and request coalescing.
//!
//! This module is record-agnostic: it caches whatever a fetcher returns,
//! keyed by [`QueryKey`]. It:
//! - Serves fresh entries without calling the fetcher
//! - Shares one in-flight fetch among concurrent readers of a key
//! - Keeps the last good data while a refetch is pending or after it fails
//! - Discards results of fetches superseded by an invalidation

mod layer;
mod types;

pub use layer::QueryCache;
pub use types::{QueryKey, QuerySnapshot};
