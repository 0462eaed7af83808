//! Shared application state

use std::sync::Arc;

use cacher::{Cacher, KvStore};

use crate::repository::TodoRepository;

/// Cache client over whichever store the deployment selected
pub type AppCache = Cacher<Box<dyn KvStore>>;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub cache: AppCache,
    pub repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(store: Box<dyn KvStore>, repo: Arc<dyn TodoRepository>) -> Self {
        Self {
            cache: Cacher::new(store),
            repo,
        }
    }
}
