//! Domain model for todos

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a todo
///
/// `image` is a reference to an already-stored file, passed through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// Pagination descriptor for a list query
///
/// Cached under its own key, separately from the rows it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub total_rows: i64,
    pub total_pages: u32,
}

/// Response shape for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoPage {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub rows: Vec<Todo>,
}
