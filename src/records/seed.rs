//! Seed datasets embedded at compile time.

use color_eyre::{eyre::eyre, Result};

use super::types::{Demo, User};

const USERS_JSON: &str = include_str!("../../data/users.json");
const DEMOS_JSON: &str = include_str!("../../data/demos.json");

/// Initial contents of the users store.
pub fn seed_users() -> Result<Vec<User>> {
  serde_json::from_str(USERS_JSON).map_err(|e| eyre!("Failed to parse seed users: {}", e))
}

/// Initial contents of the demos store.
pub fn seed_demos() -> Result<Vec<Demo>> {
  serde_json::from_str(DEMOS_JSON).map_err(|e| eyre!("Failed to parse seed demos: {}", e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn test_seed_users_parse_with_unique_ids() {
    let users = seed_users().unwrap();
    assert!(!users.is_empty());
    let ids: HashSet<i64> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), users.len());
  }

  #[test]
  fn test_seed_demos_span_multiple_pages() {
    let demos = seed_demos().unwrap();
    assert!(demos.len() > 20);
    let first: Vec<i64> = demos.iter().take(5).map(|d| d.id).collect();
    assert_eq!(first, vec![1, 2, 3, 4, 5]);
  }
}
