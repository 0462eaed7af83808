//! cacher: Cache client over a raw key-value store
//!
//! The [`Cacher`] facade wraps a [`KvStore`] with the semantics callers
//! rely on:
//!
//! - absent keys read as `None`, never as an error
//! - native strings are stored verbatim, the empty string included;
//!   structured values go through JSON
//! - deletes are batched to respect store batch limits
//! - applying TTLs to many keys reports a per-key outcome
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cacher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let cache = Cacher::new(MemoryStore::new());
//!
//!     cache.set("greeting", "hello", None).await?;
//!     assert_eq!(cache.get("greeting").await?.as_deref(), Some("hello"));
//!
//!     Ok(())
//! }
//! ```

mod facade;

// Re-export core
pub use cacher_core::*;

// Re-export storage
pub use cacher_storage::{Connect, ConnectionManager, RetryPolicy};

#[cfg(feature = "memory")]
pub use cacher_storage::MemoryStore;

#[cfg(feature = "redis")]
pub use cacher_storage::{ConnectionSettings, RedisConfig, RedisStore};

pub use facade::Cacher;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{CacheError, CacheValue, Cacher, ExpireOutcome, KvStore, Result};

    #[cfg(feature = "memory")]
    pub use crate::MemoryStore;

    #[cfg(feature = "redis")]
    pub use crate::{ConnectionSettings, RedisConfig, RedisStore};
}
