//! Key-value store trait

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::{CacheError, Result};

/// Outcome of applying a TTL to a single key
#[derive(Debug, Clone)]
pub enum ExpireOutcome {
    /// TTL applied
    Applied,
    /// Key was absent; nothing to expire
    Missing,
    /// Store rejected the command for this key
    Failed(CacheError),
}

impl ExpireOutcome {
    /// True unless the store rejected the command
    pub fn is_ok(&self) -> bool {
        !matches!(self, ExpireOutcome::Failed(_))
    }
}

/// Core trait for all key-value store implementations
///
/// Implementations speak to one store in single calls: no batch-size
/// limits, no value encoding, no empty-input short-circuits. Those
/// policies live in the `Cacher` facade on top of this trait.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Read one key
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read multiple keys at once
    ///
    /// Returns a vector of results in the same order as the input keys.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// Write one key, with an optional TTL applied together with the write
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Write multiple entries in one batched call
    async fn mset(&self, entries: &[(String, String)]) -> Result<()>;

    /// Apply a TTL to an existing key
    ///
    /// Returns `false` if the key was absent.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Delete the given keys in one call
    ///
    /// Returns the number of keys that existed and were deleted.
    async fn del(&self, keys: &[String]) -> Result<u64>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Release any connection handles held by the store
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Box<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).mget(keys).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn mset(&self, entries: &[(String, String)]) -> Result<()> {
        (**self).mset(entries).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        (**self).expire(key, ttl).await
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        (**self).del(keys).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).mget(keys).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn mset(&self, entries: &[(String, String)]) -> Result<()> {
        (**self).mset(entries).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        (**self).expire(key, ttl).await
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        (**self).del(keys).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
