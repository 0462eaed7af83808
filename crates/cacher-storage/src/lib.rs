//! cacher-storage: Store implementations for cacher
//!
//! Provides the connection lifecycle shared by remote stores, a Redis
//! store behind the `redis` feature and an in-memory store behind the
//! `memory` feature (default).

pub mod connection;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

pub use connection::{Connect, ConnectionManager, RetryPolicy};

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "redis")]
pub use redis::{ConnectionSettings, RedisConfig, RedisStore};
