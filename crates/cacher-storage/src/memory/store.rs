//! In-memory key-value store using DashMap

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use cacher_core::{KvStore, Result};

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory key-value store
///
/// Stands in for the remote store in tests and local development. Expiry
/// is lazy: an expired slot is dropped the next time it is touched.
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<String, Slot>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.data.get(key) {
            Some(slot) if slot.is_expired() => {
                drop(slot);
                self.data.remove(key);
                None
            }
            Some(slot) => Some(slot.value.clone()),
            None => None,
        }
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read(key))
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        Ok(keys.iter().map(|key| self.read(key)).collect())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        self.data.insert(
            key.to_string(),
            Slot {
                value: value.to_string(),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn mset(&self, entries: &[(String, String)]) -> Result<()> {
        for (key, value) in entries {
            self.data.insert(
                key.clone(),
                Slot {
                    value: value.clone(),
                    expires_at: None,
                },
            );
        }
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        match self.data.get_mut(key) {
            Some(mut slot) if !slot.is_expired() => {
                slot.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            Some(slot) => {
                drop(slot);
                self.data.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut deleted = 0;
        for key in keys {
            if self.data.remove(key).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.read(key).is_some())
    }
}
