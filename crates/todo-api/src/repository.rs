//! Durable todo storage

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::error::Result;
use crate::model::{NewTodo, Pagination, Todo};

/// Storage seam for todos
///
/// Listing is newest-first and paginated; `page` is 1-based.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Persist a new todo and return it with its assigned id and timestamps.
    async fn create(&self, new: NewTodo) -> Result<Todo>;

    /// Fetch one page of todos, newest first, with pagination metadata.
    async fn find_all(&self, limit: u32, page: u32) -> Result<(Vec<Todo>, Pagination)>;
}

/// In-process repository backed by a `RwLock<Vec<Todo>>`
///
/// Rows are held in insertion order; listing walks them in reverse so
/// the newest todo comes first.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    rows: RwLock<Vec<Todo>>,
    next_id: AtomicU64,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, new: NewTodo) -> Result<Todo> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let todo = Todo {
            id,
            name: new.name,
            image: new.image,
            created_at: now,
            updated_at: now,
        };

        self.rows.write().push(todo.clone());
        Ok(todo)
    }

    async fn find_all(&self, limit: u32, page: u32) -> Result<(Vec<Todo>, Pagination)> {
        let limit = limit.max(1);
        let page = page.max(1);

        let rows = self.rows.read();
        let total_rows = rows.len() as i64;
        let offset = (page as usize - 1) * limit as usize;

        let selected: Vec<Todo> = rows
            .iter()
            .rev()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();

        let total_pages = (total_rows as u64).div_ceil(limit as u64) as u32;

        let pagination = Pagination {
            limit,
            page,
            sort: Some("id desc".to_string()),
            total_rows,
            total_pages,
        };

        Ok((selected, pagination))
    }
}
