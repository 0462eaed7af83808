//! Error types for cache operations

use thiserror::Error;

/// Main error type for all cache operations
///
/// A key that is absent from the store is never an error; every read,
/// expire and delete operation reports absence through its return value.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Reconnect attempts against the backing store were exhausted
    #[error("connection retries exhausted after {attempts} attempts")]
    ConnectionExhausted { attempts: u32 },

    /// Store operation failed
    #[error("store error: {0}")]
    Store(String),

    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
