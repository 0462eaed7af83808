//! Connection lifecycle for remote stores

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cacher_core::{CacheError, Result};

/// Opens and probes handles to a remote store
///
/// A handle is whatever the store hands out for issuing commands, a
/// connection pool in practice. Handles must be cheap to clone; callers
/// run commands on their own clone, outside the manager's lock.
#[async_trait]
pub trait Connect: Send + Sync + 'static {
    /// Live handle produced by [`Connect::open`]
    type Handle: Clone + Send + Sync + 'static;

    /// Build a fresh handle from configuration
    async fn open(&self) -> Result<Self::Handle>;

    /// Probe a handle for liveness
    async fn ping(&self, handle: &Self::Handle) -> Result<()>;
}

/// Reconnect schedule: exponential backoff clamped to a ceiling
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Connection attempts before giving up
    pub attempts: u32,
    /// Delay after the first failed attempt
    pub min_backoff: Duration,
    /// Ceiling for the delay curve
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            min_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given zero-based failed attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.min_backoff.saturating_mul(factor).min(self.max_backoff)
    }
}

/// Lazily opens a shared store handle, revalidating it on every acquisition.
///
/// The slot lock is held for the whole acquire, ping and replace sequence,
/// so concurrent callers never race to reconnect; a failed handle is
/// replaced exactly once. Command I/O happens on the returned clone after
/// the lock is released.
pub struct ConnectionManager<C: Connect> {
    connector: C,
    retry: RetryPolicy,
    slot: Mutex<Option<C::Handle>>,
}

impl<C: Connect> ConnectionManager<C> {
    /// Create a manager; no connection is opened until first use
    pub fn new(connector: C, retry: RetryPolicy) -> Self {
        Self {
            connector,
            retry,
            slot: Mutex::new(None),
        }
    }

    /// A live handle, opening or replacing the shared one as needed
    ///
    /// Every call probes the handle before returning it. Fails with
    /// [`CacheError::ConnectionExhausted`] once the retry budget is spent.
    pub async fn acquire(&self) -> Result<C::Handle> {
        let mut slot = self.slot.lock().await;

        for attempt in 0..self.retry.attempts {
            if attempt > 0 {
                tokio::time::sleep(self.retry.backoff(attempt - 1)).await;
            }

            let handle = match slot.take() {
                Some(handle) => handle,
                None => match self.connector.open().await {
                    Ok(handle) => handle,
                    Err(error) => {
                        tracing::warn!(attempt, %error, "store connection failed");
                        continue;
                    }
                },
            };

            match self.connector.ping(&handle).await {
                Ok(()) => {
                    *slot = Some(handle.clone());
                    return Ok(handle);
                }
                Err(error) => {
                    tracing::warn!(attempt, %error, "store ping failed, dropping handle");
                }
            }
        }

        Err(CacheError::ConnectionExhausted {
            attempts: self.retry.attempts,
        })
    }

    /// Release the shared handle; the next acquisition reopens
    ///
    /// A released handle finishes closing once its last in-flight clone
    /// is dropped.
    pub async fn close(&self) {
        self.slot.lock().await.take();
    }
}
