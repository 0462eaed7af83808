//! Todo CRUD service with a cache-backed read path
//!
//! The list endpoint reads through the cache: row data and pagination
//! metadata live under paired keys, corrupt entries self-heal, and misses
//! fall back to the repository before refilling exactly the keys that
//! were absent.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod repository;
pub mod routes;
pub mod state;
