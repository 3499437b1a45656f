use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt::Debug;

/// An entity held by a record store.
///
/// The identifier is unique within its store and never changes after
/// creation. Partial updates go through [`Record::Patch`], which by
/// construction cannot touch the identifier.
pub trait Record: Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Partial record used by updates. Unset fields leave the record unchanged.
  type Patch: Clone + Debug + Default + Send + Sync + 'static;

  fn id(&self) -> i64;

  /// Shallow-merge the patch into this record.
  fn apply(&mut self, patch: &Self::Patch);

  /// Display name, used in titles and confirmations
  fn name(&self) -> &str;

  /// Patch that only renames the record
  fn rename(name: &str) -> Self::Patch;

  /// Resource key of the collection (e.g. "users")
  fn resource() -> &'static str;

  /// Resource key prefix for single-record queries (e.g. "user")
  fn item_resource() -> &'static str;
}

/// A team member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
}

impl User {
  /// Case-insensitive substring match against name, email and role.
  pub fn matches(&self, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
      return true;
    }
    self.name.to_lowercase().contains(&query)
      || self.email.to_lowercase().contains(&query)
      || self
        .role
        .as_ref()
        .is_some_and(|role| role.to_lowercase().contains(&query))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub name: Option<String>,
  pub email: Option<String>,
  pub avatar_url: Option<String>,
  pub role: Option<String>,
}

impl UserPatch {
  pub fn name(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Self::default()
    }
  }
}

impl Record for User {
  type Patch = UserPatch;

  fn id(&self) -> i64 {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn rename(name: &str) -> UserPatch {
    UserPatch::name(name)
  }

  fn apply(&mut self, patch: &UserPatch) {
    if let Some(name) = &patch.name {
      self.name = name.clone();
    }
    if let Some(email) = &patch.email {
      self.email = email.clone();
    }
    if let Some(avatar_url) = &patch.avatar_url {
      self.avatar_url = Some(avatar_url.clone());
    }
    if let Some(role) = &patch.role {
      self.role = Some(role.clone());
    }
  }

  fn resource() -> &'static str {
    "users"
  }

  fn item_resource() -> &'static str {
    "user"
  }
}

/// A demo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demo {
  pub id: i64,
  pub name: String,
  pub date: NaiveDate,
}

impl Demo {
  /// Date formatted for tables, e.g. "5 Mar 2024"
  pub fn display_date(&self) -> String {
    self.date.format("%-d %b %Y").to_string()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoPatch {
  pub name: Option<String>,
  pub date: Option<NaiveDate>,
}

impl DemoPatch {
  pub fn name(name: impl Into<String>) -> Self {
    Self {
      name: Some(name.into()),
      ..Self::default()
    }
  }
}

impl Record for Demo {
  type Patch = DemoPatch;

  fn id(&self) -> i64 {
    self.id
  }

  fn name(&self) -> &str {
    &self.name
  }

  fn rename(name: &str) -> DemoPatch {
    DemoPatch::name(name)
  }

  fn apply(&mut self, patch: &DemoPatch) {
    if let Some(name) = &patch.name {
      self.name = name.clone();
    }
    if let Some(date) = patch.date {
      self.date = date;
    }
  }

  fn resource() -> &'static str {
    "demos"
  }

  fn item_resource() -> &'static str {
    "demo"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ada() -> User {
    User {
      id: 1,
      name: "Ada Lovelace".to_string(),
      email: "ada@example.com".to_string(),
      avatar_url: None,
      role: Some("Engineering Lead".to_string()),
    }
  }

  #[test]
  fn test_user_patch_overlays_only_set_fields() {
    let mut user = ada();
    user.apply(&UserPatch {
      email: Some("countess@example.com".to_string()),
      ..UserPatch::default()
    });

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Ada Lovelace");
    assert_eq!(user.email, "countess@example.com");
    assert_eq!(user.role.as_deref(), Some("Engineering Lead"));
  }

  #[test]
  fn test_empty_patch_is_noop() {
    let mut user = ada();
    user.apply(&UserPatch::default());
    assert_eq!(user, ada());
  }

  #[test]
  fn test_user_matches_name_email_and_role() {
    let user = ada();
    assert!(user.matches("LOVE"));
    assert!(user.matches("example.com"));
    assert!(user.matches("lead"));
    assert!(user.matches(""));
    assert!(!user.matches("turing"));
  }

  #[test]
  fn test_user_without_role_does_not_match_role_query() {
    let user = User { role: None, ..ada() };
    assert!(!user.matches("lead"));
  }

  #[test]
  fn test_user_wire_format_is_camel_case() {
    let json = r#"{"id":7,"name":"Dennis","email":"d@example.com","avatarUrl":"https://x/y.png"}"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.avatar_url.as_deref(), Some("https://x/y.png"));
    assert_eq!(user.role, None);
  }

  #[test]
  fn test_demo_patch_and_date_display() {
    let mut demo = Demo {
      id: 3,
      name: "Demo".to_string(),
      date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
    };
    assert_eq!(demo.display_date(), "5 Mar 2024");

    demo.apply(&DemoPatch::name("Renamed"));
    assert_eq!(demo.name, "Renamed");
    assert_eq!(demo.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
  }
}
