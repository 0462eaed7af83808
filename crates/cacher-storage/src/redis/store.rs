//! Redis-backed key-value store

use std::time::Duration;

use ::redis::AsyncCommands;
use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use bb8_redis::RedisConnectionManager;

use cacher_core::{CacheError, KvStore, Result};

use super::config::RedisConfig;
use crate::connection::{Connect, ConnectionManager, RetryPolicy};

/// Opens bb8 pools against the configured server
struct RedisConnect {
    config: RedisConfig,
}

#[async_trait]
impl Connect for RedisConnect {
    type Handle = Pool<RedisConnectionManager>;

    async fn open(&self) -> Result<Self::Handle> {
        let manager = RedisConnectionManager::new(self.config.url())
            .map_err(|e| CacheError::Store(e.to_string()))?;

        let settings = &self.config.settings;
        Pool::builder()
            .max_size(settings.pool_size)
            .min_idle(Some(settings.min_idle))
            .connection_timeout(settings.pool_timeout)
            .idle_timeout(Some(settings.idle_timeout))
            .reaper_rate(settings.idle_check_frequency)
            // liveness probing belongs to the connection manager
            .test_on_check_out(false)
            .build(manager)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    async fn ping(&self, pool: &Self::Handle) -> Result<()> {
        let mut conn = checkout(pool).await?;
        let _: String = ::redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(())
    }
}

async fn checkout(
    pool: &Pool<RedisConnectionManager>,
) -> Result<PooledConnection<'_, RedisConnectionManager>> {
    pool.get()
        .await
        .map_err(|e| CacheError::Store(e.to_string()))
}

/// Run a command future against a deadline
async fn bounded<T>(
    limit: Duration,
    command: impl Future<Output = ::redis::RedisResult<T>> + Send,
) -> Result<T> {
    match tokio::time::timeout(limit, command).await {
        Ok(result) => result.map_err(|e| CacheError::Store(e.to_string())),
        Err(_) => Err(CacheError::Store(format!(
            "command exceeded {limit:?} deadline"
        ))),
    }
}

/// TTL in whole seconds; never zero, which SETEX rejects and EXPIRE
/// treats as an immediate delete.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis-backed key-value store
///
/// Construction performs no I/O; the pool is opened by the connection
/// manager on first use and revalidated with PING before every operation.
/// Commands run under the configured read and write deadlines.
pub struct RedisStore {
    manager: ConnectionManager<RedisConnect>,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl RedisStore {
    /// Create a store for the given configuration
    pub fn new(config: RedisConfig) -> Self {
        let retry = RetryPolicy::from(&config.settings);
        let read_timeout = config.settings.read_timeout;
        let write_timeout = config.settings.write_timeout;
        Self {
            manager: ConnectionManager::new(RedisConnect { config }, retry),
            read_timeout,
            write_timeout,
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        let value: Option<String> = bounded(self.read_timeout, conn.get(key)).await?;
        Ok(value)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        let values: Vec<Option<String>> = bounded(self.read_timeout, conn.mget(keys)).await?;
        Ok(values)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        match ttl {
            Some(ttl) => {
                let _: () = bounded(
                    self.write_timeout,
                    conn.set_ex(key, value, ttl_seconds(ttl)),
                )
                .await?;
            }
            None => {
                let _: () = bounded(self.write_timeout, conn.set(key, value)).await?;
            }
        }
        Ok(())
    }

    async fn mset(&self, entries: &[(String, String)]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;

        let mut command = ::redis::cmd("MSET");
        for (key, value) in entries {
            command.arg(key).arg(value);
        }
        let _: () = bounded(self.write_timeout, command.query_async(&mut *conn)).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        let applied: bool = bounded(
            self.write_timeout,
            conn.expire(key, ttl_seconds(ttl) as i64),
        )
        .await?;
        Ok(applied)
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        let deleted: u64 = bounded(self.write_timeout, conn.del(keys)).await?;
        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let pool = self.manager.acquire().await?;
        let mut conn = checkout(&pool).await?;
        let present: bool = bounded(self.read_timeout, conn.exists(key)).await?;
        Ok(present)
    }

    async fn close(&self) -> Result<()> {
        self.manager.close().await;
        Ok(())
    }
}
