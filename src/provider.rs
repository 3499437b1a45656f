//! Providers: one read model + mutation API per resource.
//!
//! A provider composes a [`ResourceService`] with two query caches, one for
//! the collection and one for single records fetched by id. It is cheap to
//! clone and is handed explicitly to every view that needs it.
//!
//! Mutations never touch cached data directly. When an update or delete
//! settles, successfully or not, the affected keys are invalidated and the
//! next read refetches.

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryKey, QuerySnapshot};
use crate::config::Config;
use crate::records::{seed_demos, seed_users, Demo, Record, User};
use crate::service::{Operation, ResourceService, ServiceError, SimulatedNetwork};

/// What a consumer renders: `{ records, is_pending, is_error }` plus the
/// error detail.
#[derive(Debug, Clone)]
pub struct ResourceState<R> {
  pub records: Option<Vec<R>>,
  pub is_pending: bool,
  pub is_error: bool,
  pub error: Option<ServiceError>,
  /// A refetch is running; `records` still holds the previous data
  pub is_fetching: bool,
}

impl<R> From<QuerySnapshot<Vec<R>>> for ResourceState<R> {
  fn from(snapshot: QuerySnapshot<Vec<R>>) -> Self {
    Self {
      is_pending: snapshot.is_pending(),
      is_error: snapshot.is_error(),
      is_fetching: snapshot.is_fetching,
      records: snapshot.data,
      error: snapshot.error,
    }
  }
}

struct Inner<R: Record> {
  service: Arc<ResourceService<R>>,
  lists: QueryCache<Vec<R>>,
  items: QueryCache<Option<R>>,
}

pub struct ResourceProvider<R: Record> {
  inner: Arc<Inner<R>>,
}

impl<R: Record> Clone for ResourceProvider<R> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<R: Record> ResourceProvider<R> {
  pub fn new(service: ResourceService<R>, stale_time: Duration) -> Self {
    Self {
      inner: Arc::new(Inner {
        service: Arc::new(service),
        lists: QueryCache::new(stale_time),
        items: QueryCache::new(stale_time),
      }),
    }
  }

  pub fn list_key() -> QueryKey {
    QueryKey::collection(R::resource())
  }

  pub fn item_key(id: i64) -> QueryKey {
    QueryKey::item(R::item_resource(), id)
  }

  pub fn service(&self) -> &ResourceService<R> {
    &self.inner.service
  }

  /// All records, through the cache.
  pub async fn records(&self) -> Result<Vec<R>, ServiceError> {
    let service = Arc::clone(&self.inner.service);
    let result = self
      .inner
      .lists
      .fetch(Self::list_key(), move || async move { service.list().await })
      .await?;
    debug!(resource = R::resource(), source = ?result.source, "read collection");
    Ok(result.data)
  }

  /// A single record by id, through the cache.
  pub async fn get(&self, id: i64) -> Result<Option<R>, ServiceError> {
    let service = Arc::clone(&self.inner.service);
    let result = self
      .inner
      .items
      .fetch(Self::item_key(id), move || async move { service.get(id).await })
      .await?;
    debug!(resource = R::resource(), id, source = ?result.source, "read record");
    Ok(result.data)
  }

  /// Current read model of the collection.
  pub fn state(&self) -> ResourceState<R> {
    self.inner.lists.snapshot(Self::list_key()).into()
  }

  pub fn item_snapshot(&self, id: i64) -> QuerySnapshot<Option<R>> {
    self.inner.items.snapshot(Self::item_key(id))
  }

  /// Merge `patch` into the record with `id`.
  pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R, ServiceError> {
    let result = self.inner.service.update(id, patch).await;
    self.settle(Operation::Update, id, &result);
    result
  }

  /// Delete the record with `id`.
  pub async fn delete(&self, id: i64) -> Result<R, ServiceError> {
    let result = self.inner.service.delete(id).await;
    self.settle(Operation::Delete, id, &result);
    result
  }

  /// Force the collection to refetch on its next read.
  pub fn invalidate(&self) {
    self.inner.lists.invalidate(Self::list_key());
  }

  pub fn invalidate_item(&self, id: i64) {
    self.inner.items.invalidate(Self::item_key(id));
  }

  /// Force the collection and every cached record to refetch.
  pub fn refresh(&self) {
    self.inner.lists.invalidate_resource(R::resource());
    self.inner.items.invalidate_resource(R::item_resource());
  }

  fn settle(&self, op: Operation, id: i64, result: &Result<R, ServiceError>) {
    match result {
      Ok(_) => info!(resource = R::resource(), %op, id, "mutation succeeded"),
      Err(e) if e.is_not_found() => {
        info!(resource = R::resource(), %op, id, "mutation target already gone")
      }
      Err(e) => warn!(resource = R::resource(), %op, id, error = %e, "mutation failed"),
    }
    self.invalidate();
    self.invalidate_item(id);
  }

  /// Source for observing the collection from a view.
  pub fn list_source(&self) -> ListSource<R> {
    ListSource {
      provider: self.clone(),
    }
  }

  /// Source for observing one record from a view.
  pub fn item_source(&self, id: i64) -> ItemSource<R> {
    ItemSource {
      provider: self.clone(),
      id,
    }
  }
}

/// Something a view can observe: a cached query it can read, fetch and
/// invalidate.
pub trait QuerySource<T>: Send + Sync + 'static {
  fn snapshot(&self) -> QuerySnapshot<T>;

  /// Read through the cache (fetching only when needed)
  fn fetch(&self) -> BoxFuture<'static, Result<T, ServiceError>>;

  fn invalidate(&self);
}

pub struct ListSource<R: Record> {
  provider: ResourceProvider<R>,
}

impl<R: Record> QuerySource<Vec<R>> for ListSource<R> {
  fn snapshot(&self) -> QuerySnapshot<Vec<R>> {
    self
      .provider
      .inner
      .lists
      .snapshot(ResourceProvider::<R>::list_key())
  }

  fn fetch(&self) -> BoxFuture<'static, Result<Vec<R>, ServiceError>> {
    let provider = self.provider.clone();
    async move { provider.records().await }.boxed()
  }

  fn invalidate(&self) {
    self.provider.refresh();
  }
}

pub struct ItemSource<R: Record> {
  provider: ResourceProvider<R>,
  id: i64,
}

impl<R: Record> QuerySource<Option<R>> for ItemSource<R> {
  fn snapshot(&self) -> QuerySnapshot<Option<R>> {
    self.provider.item_snapshot(self.id)
  }

  fn fetch(&self) -> BoxFuture<'static, Result<Option<R>, ServiceError>> {
    let provider = self.provider.clone();
    let id = self.id;
    async move { provider.get(id).await }.boxed()
  }

  fn invalidate(&self) {
    self.provider.invalidate_item(self.id);
  }
}

pub type UserProvider = ResourceProvider<User>;
pub type DemoProvider = ResourceProvider<Demo>;

/// Every provider of the application, built once at start.
#[derive(Clone)]
pub struct Providers {
  pub users: UserProvider,
  pub demos: DemoProvider,
}

impl Providers {
  /// Seed both stores and wire them to their caches.
  pub fn from_config(config: &Config) -> color_eyre::Result<Self> {
    let stale_time = config.cache.stale_time();

    let users = ResourceService::new(
      seed_users()?,
      SimulatedNetwork::from_config(&config.network.users),
    );
    let demos = ResourceService::new(
      seed_demos()?,
      SimulatedNetwork::from_config(&config.network.demos),
    );

    info!(
      stale_secs = config.cache.stale_secs,
      users_fail_every = ?config.network.users.fail_every,
      demos_fail_every = ?config.network.demos.fail_every,
      "providers ready"
    );

    Ok(Self {
      users: ResourceProvider::new(users, stale_time),
      demos: ResourceProvider::new(demos, stale_time),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::records::{DemoPatch, UserPatch};
  use chrono::NaiveDate;

  fn demo_provider(network: SimulatedNetwork) -> DemoProvider {
    let demos = (1..=5)
      .map(|id| Demo {
        id,
        name: format!("Demo {}", id),
        date: NaiveDate::from_ymd_opt(2024, 5, id as u32).unwrap(),
      })
      .collect();
    ResourceProvider::new(ResourceService::new(demos, network), Duration::from_secs(30))
  }

  fn user_provider() -> UserProvider {
    let users = vec![User {
      id: 1,
      name: "Grace".to_string(),
      email: "grace@example.com".to_string(),
      avatar_url: None,
      role: None,
    }];
    ResourceProvider::new(
      ResourceService::new(users, SimulatedNetwork::instant()),
      Duration::from_secs(30),
    )
  }

  #[tokio::test(start_paused = true)]
  async fn test_concurrent_reads_issue_one_list_call() {
    let provider = demo_provider(SimulatedNetwork::new(
      Duration::from_millis(300),
      Duration::from_millis(200),
    ));

    let (a, b) = tokio::join!(provider.records(), provider.records());

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(provider.service().calls(Operation::List), 1);
  }

  #[tokio::test]
  async fn test_fresh_reads_do_not_hit_service() {
    let provider = demo_provider(SimulatedNetwork::instant());
    provider.records().await.unwrap();
    provider.records().await.unwrap();
    assert_eq!(provider.service().calls(Operation::List), 1);
  }

  #[tokio::test]
  async fn test_delete_then_list_refetches() {
    let provider = demo_provider(SimulatedNetwork::instant());
    assert_eq!(provider.records().await.unwrap().len(), 5);

    let removed = provider.delete(3).await.unwrap();
    assert_eq!(removed.id, 3);

    let demos = provider.records().await.unwrap();
    assert_eq!(demos.len(), 4);
    assert!(demos.iter().all(|d| d.id != 3));
    assert_eq!(provider.service().calls(Operation::List), 2);
  }

  #[tokio::test]
  async fn test_mutation_is_not_applied_optimistically() {
    let provider = demo_provider(SimulatedNetwork::instant());
    provider.records().await.unwrap();

    provider.update(2, DemoPatch::name("Renamed")).await.unwrap();

    // Cached data is untouched until the refetch lands
    let state = provider.state();
    let cached = state.records.unwrap();
    assert_eq!(cached[1].name, "Demo 2");
    assert!(provider.inner.lists.snapshot(DemoProvider::list_key()).is_stale);

    let fresh = provider.records().await.unwrap();
    assert_eq!(fresh[1].name, "Renamed");
  }

  #[tokio::test]
  async fn test_failed_update_still_invalidates() {
    let provider = user_provider();
    let before = provider.records().await.unwrap();

    let err = provider.update(999, UserPatch::name("X")).await.unwrap_err();
    assert!(err.is_not_found());

    assert!(provider.inner.lists.snapshot(UserProvider::list_key()).is_stale);
    assert_eq!(provider.records().await.unwrap(), before);
    assert_eq!(provider.service().calls(Operation::List), 2);
  }

  #[tokio::test]
  async fn test_transient_failure_sets_error_and_keeps_records() {
    let provider = demo_provider(SimulatedNetwork::instant().with_fail_every(2));

    provider.records().await.unwrap();
    provider.invalidate();
    let err = provider.records().await.unwrap_err();
    assert!(err.is_transient());

    let state = provider.state();
    assert!(state.is_error);
    assert!(!state.is_pending);
    assert_eq!(state.records.map(|r| r.len()), Some(5));
    assert_eq!(state.error, Some(err));
  }

  #[tokio::test]
  async fn test_get_by_id_is_cached_and_invalidated_by_mutation() {
    let provider = demo_provider(SimulatedNetwork::instant());

    assert_eq!(provider.get(4).await.unwrap().unwrap().id, 4);
    provider.get(4).await.unwrap();
    assert_eq!(provider.service().calls(Operation::Get), 1);

    provider.delete(4).await.unwrap();
    assert!(provider.item_snapshot(4).is_stale);
    assert_eq!(provider.get(4).await.unwrap(), None);
    assert_eq!(provider.service().calls(Operation::Get), 2);
  }

  #[tokio::test]
  async fn test_initial_state_is_pending_without_records() {
    let provider = demo_provider(SimulatedNetwork::instant());
    let state = provider.state();
    assert!(state.is_pending);
    assert!(!state.is_error);
    assert!(state.records.is_none());
  }

  #[tokio::test]
  async fn test_list_source_reads_through_provider() {
    let provider = demo_provider(SimulatedNetwork::instant());
    let source = provider.list_source();

    assert!(source.snapshot().data.is_none());
    let demos = source.fetch().await.unwrap();
    assert_eq!(demos.len(), 5);
    assert!(source.snapshot().is_success());

    source.invalidate();
    assert!(source.snapshot().is_stale);
  }

  #[tokio::test]
  async fn test_refresh_invalidates_collection_and_items() {
    let provider = demo_provider(SimulatedNetwork::instant());
    provider.records().await.unwrap();
    provider.get(1).await.unwrap();
    provider.get(2).await.unwrap();

    provider.refresh();

    assert!(provider.state().records.is_some());
    assert!(provider.list_source().snapshot().is_stale);
    assert!(provider.item_snapshot(1).is_stale);
    assert!(provider.item_snapshot(2).is_stale);
    provider.records().await.unwrap();
    assert_eq!(provider.service().calls(Operation::List), 2);
  }

  #[test]
  fn test_providers_from_default_config() {
    let providers = Providers::from_config(&Config::default()).unwrap();
    assert!(providers.users.state().records.is_none());
    assert_eq!(DemoProvider::list_key().to_string(), "demos");
    assert_eq!(UserProvider::item_key(3).to_string(), "user:3");
  }
}
