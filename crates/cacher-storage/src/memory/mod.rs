//! In-memory store

mod store;

pub use store::MemoryStore;
