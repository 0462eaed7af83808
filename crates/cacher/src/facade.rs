//! Cache operations facade

use std::sync::Arc;
use std::time::Duration;

use cacher_core::{CacheValue, ExpireOutcome, KvStore, Result};

/// Upper bound on keys per DEL call against the store
const DEL_BATCH_SIZE: usize = 10_000;

/// Cache operations facade over a raw key-value store
///
/// Owns the policies the stores stay free of: value encoding, empty-input
/// short-circuits, delete batching and per-key TTL reporting. Cloning is
/// cheap and shares the underlying store.
pub struct Cacher<S: KvStore> {
    store: Arc<S>,
}

impl<S: KvStore> Clone for Cacher<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: KvStore> Cacher<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Read one key
    ///
    /// `None` means the key is absent; the empty string is a present value.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.store.get(key).await
    }

    /// Read many keys, results aligned with input order
    ///
    /// An empty key list short-circuits to an empty result.
    pub async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.store.mget(keys).await
    }

    /// Write one value, with an optional TTL
    ///
    /// Strings are stored verbatim; pass [`CacheValue::json`] for
    /// structured values.
    pub async fn set(
        &self,
        key: &str,
        value: impl Into<CacheValue>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let value = value.into();
        self.store.set(key, value.as_str(), ttl).await
    }

    /// Write many values in one batched call; empty input is a no-op
    pub async fn mset(&self, entries: Vec<(String, CacheValue)>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(key, value)| (key, value.into_string()))
            .collect();
        self.store.mset(&entries).await
    }

    /// Apply a TTL to one key; an absent key is not an error
    pub async fn expire(&self, key: &str, ttl: Duration) -> Result<ExpireOutcome> {
        match self.store.expire(key, ttl).await? {
            true => Ok(ExpireOutcome::Applied),
            false => Ok(ExpireOutcome::Missing),
        }
    }

    /// Apply one TTL to many keys
    ///
    /// Every key is attempted; store failures land in that key's outcome
    /// instead of aborting the batch. The vector is aligned with the
    /// input order.
    pub async fn expire_many(&self, keys: &[String], ttl: Duration) -> Vec<ExpireOutcome> {
        let mut outcomes = Vec::with_capacity(keys.len());
        for key in keys {
            let outcome = match self.store.expire(key, ttl).await {
                Ok(true) => ExpireOutcome::Applied,
                Ok(false) => ExpireOutcome::Missing,
                Err(err) => ExpireOutcome::Failed(err),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Delete keys, batching the underlying calls
    ///
    /// Returns how many keys existed and were deleted. Deleting nothing
    /// issues no store call at all.
    pub async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut deleted = 0;
        for batch in keys.chunks(DEL_BATCH_SIZE) {
            deleted += self.store.del(batch).await?;
        }
        Ok(deleted)
    }

    /// Check one key's presence
    pub async fn exists(&self, key: &str) -> Result<bool> {
        self.store.exists(key).await
    }

    /// Release the store's connection handles
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }
}
