//! Redis store implementation

mod config;
mod store;

pub use config::{ConnectionSettings, RedisConfig};
pub use store::RedisStore;
