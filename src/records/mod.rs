//! Record types and the in-memory stores that own them.
//!
//! Two resources exist: team members ("users") and demo records ("demos").
//! Both share the [`Record`] trait so the service, cache and provider layers
//! are written once and instantiated per resource.

mod seed;
mod store;
mod types;

pub use seed::{seed_demos, seed_users};
pub use store::RecordStore;
pub use types::{Demo, DemoPatch, Record, User, UserPatch};
