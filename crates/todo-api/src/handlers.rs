//! HTTP handlers
//!
//! Listing reads through the cache: each `(limit, page)` combination maps
//! to a pair of keys, one holding the serialized rows and one holding the
//! pagination metadata. A miss on either slot triggers a single repository
//! query, after which only the genuinely absent slots are written back and
//! given a short TTL. Cache failures degrade to plain repository reads;
//! only an exhausted connection fails the request.

use std::time::Duration;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use cacher::{CacheError, CacheValue, ExpireOutcome};

use crate::error::{ApiError, Result};
use crate::model::{NewTodo, Todo, TodoPage};
use crate::state::{AppCache, AppState};

/// How long a cached listing stays valid
const LIST_CACHE_TTL: Duration = Duration::from_secs(10);

const DEFAULT_LIMIT: u32 = 24;
const DEFAULT_PAGE: u32 = 1;

/// Query parameters accepted by the listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl ListParams {
    /// Fill in defaults and clamp zeroes, which would otherwise produce
    /// empty pages and a division by zero in the page math.
    fn normalize(&self) -> (u32, u32) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        (limit, page)
    }
}

/// Cache keys for one page of the listing: `(rows, pagination)`
fn list_cache_keys(limit: u32, page: u32) -> (String, String) {
    (
        format!("todo::all::{limit}::{page}"),
        format!("todo::page::{limit}::{page}"),
    )
}

/// Decode one cached slot, deleting it if it holds garbage.
///
/// Returns `None` for absent or empty slots and for entries that no
/// longer decode; the caller treats all of those as a miss and refills.
async fn decode_slot<T: DeserializeOwned>(
    cache: &AppCache,
    key: &str,
    raw: Option<&str>,
) -> Option<T> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    match CacheValue::decode(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "corrupt cache entry, deleting");
            if let Err(err) = cache.del(&[key.to_string()]).await {
                warn!(key, error = %err, "failed to delete corrupt cache entry");
            }
            None
        }
    }
}

/// Queue a write-back entry, skipping values that fail to serialize.
fn stage<T: Serialize>(staged: &mut Vec<(String, CacheValue)>, key: &str, value: &T) {
    match CacheValue::json(value) {
        Ok(encoded) => staged.push((key.to_string(), encoded)),
        Err(err) => warn!(key, error = %err, "skipping cache write-back"),
    }
}

/// GET /api/todo
pub async fn find_todos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<TodoPage>> {
    let (limit, page) = params.normalize();
    let (data_key, meta_key) = list_cache_keys(limit, page);
    let keys = vec![data_key.clone(), meta_key.clone()];

    let cached = match state.cache.mget(&keys).await {
        Ok(values) => values,
        Err(err @ CacheError::ConnectionExhausted { .. }) => return Err(err.into()),
        Err(err) => {
            warn!(error = %err, "cache read failed, falling back to repository");
            vec![None, None]
        }
    };

    let cached_rows: Option<Vec<Todo>> =
        decode_slot(&state.cache, &data_key, cached.first().and_then(|s| s.as_deref())).await;
    let cached_paging =
        decode_slot(&state.cache, &meta_key, cached.get(1).and_then(|s| s.as_deref())).await;

    let mut staged: Vec<(String, CacheValue)> = Vec::new();

    let (rows, pagination) = match (cached_rows, cached_paging) {
        (Some(rows), Some(pagination)) => (rows, pagination),
        (cached_rows, cached_paging) => {
            let (fresh_rows, fresh_paging) = state.repo.find_all(limit, page).await?;

            // Cached slots win over the fresh query; only the slots that
            // actually missed get written back.
            let rows = match cached_rows {
                Some(rows) => rows,
                None => {
                    stage(&mut staged, &data_key, &fresh_rows);
                    fresh_rows
                }
            };
            let pagination = match cached_paging {
                Some(pagination) => pagination,
                None => {
                    stage(&mut staged, &meta_key, &fresh_paging);
                    fresh_paging
                }
            };

            (rows, pagination)
        }
    };

    if !staged.is_empty() {
        let staged_keys: Vec<String> = staged.iter().map(|(key, _)| key.clone()).collect();
        match state.cache.mset(staged).await {
            Err(err) => warn!(error = %err, "cache write-back failed"),
            Ok(()) => {
                let outcomes = state.cache.expire_many(&staged_keys, LIST_CACHE_TTL).await;
                for (key, outcome) in staged_keys.iter().zip(outcomes) {
                    if let ExpireOutcome::Failed(err) = outcome {
                        warn!(key, error = %err, "failed to set cache ttl");
                    }
                }
            }
        }
    }

    Ok(Json(TodoPage { pagination, rows }))
}

/// POST /api/todo
pub async fn create_todo(
    State(state): State<AppState>,
    Json(new): Json<NewTodo>,
) -> Result<(StatusCode, Json<Todo>)> {
    if new.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("name must not be empty".to_string()));
    }

    let todo = state.repo.create(new).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// GET /healthz
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use cacher::{KvStore, MemoryStore};

    use crate::model::Pagination;
    use crate::repository::{InMemoryTodoRepository, TodoRepository};

    /// Repository wrapper that counts how often the query path runs.
    struct CountingRepository {
        inner: InMemoryTodoRepository,
        find_calls: AtomicUsize,
    }

    impl CountingRepository {
        fn new() -> Self {
            Self {
                inner: InMemoryTodoRepository::new(),
                find_calls: AtomicUsize::new(0),
            }
        }

        fn find_count(&self) -> usize {
            self.find_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TodoRepository for CountingRepository {
        async fn create(&self, new: NewTodo) -> crate::error::Result<Todo> {
            self.inner.create(new).await
        }

        async fn find_all(
            &self,
            limit: u32,
            page: u32,
        ) -> crate::error::Result<(Vec<Todo>, Pagination)> {
            self.find_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find_all(limit, page).await
        }
    }

    /// Store wrapper that records which keys get a TTL.
    struct ExpireRecorder {
        inner: MemoryStore,
        expired: Arc<Mutex<Vec<String>>>,
    }

    impl ExpireRecorder {
        fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
            let expired = Arc::new(Mutex::new(Vec::new()));
            let recorder = Self {
                inner: MemoryStore::new(),
                expired: expired.clone(),
            };
            (recorder, expired)
        }
    }

    #[async_trait]
    impl KvStore for ExpireRecorder {
        async fn get(&self, key: &str) -> cacher::Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn mget(&self, keys: &[String]) -> cacher::Result<Vec<Option<String>>> {
            self.inner.mget(keys).await
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
            ttl: Option<Duration>,
        ) -> cacher::Result<()> {
            self.inner.set(key, value, ttl).await
        }

        async fn mset(&self, entries: &[(String, String)]) -> cacher::Result<()> {
            self.inner.mset(entries).await
        }

        async fn expire(&self, key: &str, ttl: Duration) -> cacher::Result<bool> {
            self.expired.lock().push(key.to_string());
            self.inner.expire(key, ttl).await
        }

        async fn del(&self, keys: &[String]) -> cacher::Result<u64> {
            self.inner.del(keys).await
        }

        async fn exists(&self, key: &str) -> cacher::Result<bool> {
            self.inner.exists(key).await
        }
    }

    /// Store that fails every read with a retryable error.
    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> cacher::Result<Option<String>> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn mget(&self, _keys: &[String]) -> cacher::Result<Vec<Option<String>>> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Option<Duration>,
        ) -> cacher::Result<()> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn mset(&self, _entries: &[(String, String)]) -> cacher::Result<()> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn expire(&self, _key: &str, _ttl: Duration) -> cacher::Result<bool> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn del(&self, _keys: &[String]) -> cacher::Result<u64> {
            Err(CacheError::Store("boom".to_string()))
        }

        async fn exists(&self, _key: &str) -> cacher::Result<bool> {
            Err(CacheError::Store("boom".to_string()))
        }
    }

    /// Store whose reads report the retry budget as spent.
    struct ExhaustedStore;

    #[async_trait]
    impl KvStore for ExhaustedStore {
        async fn get(&self, _key: &str) -> cacher::Result<Option<String>> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn mget(&self, _keys: &[String]) -> cacher::Result<Vec<Option<String>>> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn set(
            &self,
            _key: &str,
            _value: &str,
            _ttl: Option<Duration>,
        ) -> cacher::Result<()> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn mset(&self, _entries: &[(String, String)]) -> cacher::Result<()> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn expire(&self, _key: &str, _ttl: Duration) -> cacher::Result<bool> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn del(&self, _keys: &[String]) -> cacher::Result<u64> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }

        async fn exists(&self, _key: &str) -> cacher::Result<bool> {
            Err(CacheError::ConnectionExhausted { attempts: 5 })
        }
    }

    fn counting_state(store: Box<dyn KvStore>) -> (AppState, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::new());
        let state = AppState::new(store, repo.clone());
        (state, repo)
    }

    async fn seed(repo: &CountingRepository, count: usize) {
        for i in 1..=count {
            repo.create(NewTodo {
                name: format!("todo-{i}"),
                image: String::new(),
            })
            .await
            .unwrap();
        }
    }

    fn params(limit: Option<u32>, page: Option<u32>) -> Query<ListParams> {
        Query(ListParams { limit, page })
    }

    #[test]
    fn test_list_cache_keys_pair_up() {
        let (data, meta) = list_cache_keys(24, 3);
        assert_eq!(data, "todo::all::24::3");
        assert_eq!(meta, "todo::page::24::3");
    }

    #[test]
    fn test_normalize_defaults_and_clamps() {
        assert_eq!(params(None, None).0.normalize(), (24, 1));
        assert_eq!(params(Some(0), Some(0)).0.normalize(), (1, 1));
        assert_eq!(params(Some(10), Some(2)).0.normalize(), (10, 2));
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let (state, repo) = counting_state(Box::new(MemoryStore::new()));
        seed(&repo, 3).await;

        let first = find_todos(State(state.clone()), params(None, None))
            .await
            .unwrap();
        assert_eq!(first.0.rows.len(), 3);
        assert_eq!(repo.find_count(), 1);

        let second = find_todos(State(state), params(None, None)).await.unwrap();
        assert_eq!(second.0.rows.len(), 3);
        assert_eq!(second.0.pagination.total_rows, 3);
        assert_eq!(repo.find_count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_metadata_slot_heals_itself() {
        let (state, repo) = counting_state(Box::new(MemoryStore::new()));
        seed(&repo, 2).await;

        // Warm both slots, then clobber the metadata one.
        find_todos(State(state.clone()), params(None, None))
            .await
            .unwrap();
        let (_, meta_key) = list_cache_keys(24, 1);
        state.cache.set(&meta_key, "{not json", None).await.unwrap();

        let healed = find_todos(State(state.clone()), params(None, None))
            .await
            .unwrap();
        assert_eq!(healed.0.pagination.total_rows, 2);
        assert_eq!(repo.find_count(), 2);

        // The refilled slot decodes again on the next pass.
        let raw = state.cache.get(&meta_key).await.unwrap().unwrap();
        assert!(CacheValue::decode::<Pagination>(&raw).is_ok());
    }

    #[tokio::test]
    async fn test_only_missing_slots_are_written_back() {
        let (recorder, expired) = ExpireRecorder::new();
        let (state, repo) = counting_state(Box::new(recorder));
        seed(&repo, 2).await;

        find_todos(State(state.clone()), params(None, None))
            .await
            .unwrap();
        let (data_key, meta_key) = list_cache_keys(24, 1);
        assert_eq!(*expired.lock(), vec![data_key.clone(), meta_key.clone()]);

        // Drop only the metadata slot; the next read must refill just it.
        state.cache.del(&[meta_key.clone()]).await.unwrap();
        expired.lock().clear();

        let page = find_todos(State(state.clone()), params(None, None))
            .await
            .unwrap();
        assert_eq!(page.0.rows.len(), 2);
        assert_eq!(repo.find_count(), 2);
        assert_eq!(*expired.lock(), vec![meta_key]);
    }

    #[tokio::test]
    async fn test_cache_outage_degrades_to_repository() {
        let (state, repo) = counting_state(Box::new(BrokenStore));
        seed(&repo, 1).await;

        let page = find_todos(State(state), params(None, None)).await.unwrap();
        assert_eq!(page.0.rows.len(), 1);
        assert_eq!(repo.find_count(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_connection_fails_the_request() {
        let (state, _repo) = counting_state(Box::new(ExhaustedStore));

        let err = find_todos(State(state), params(None, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Cache(CacheError::ConnectionExhausted { attempts: 5 })
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_names() {
        let (state, _repo) = counting_state(Box::new(MemoryStore::new()));

        let err = create_todo(
            State(state),
            Json(NewTodo {
                name: "   ".to_string(),
                image: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
