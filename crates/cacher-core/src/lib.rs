//! cacher-core: Core traits and types for the cacher library
//!
//! This crate provides the error taxonomy, the value encoding rules and the
//! raw store trait shared by every cacher storage implementation.

mod error;
mod store;
mod value;

pub use error::{CacheError, Result};
pub use store::{ExpireOutcome, KvStore};
pub use value::CacheValue;
