//! Memoir persistence.
//!
//! [`MemoirStore`] owns the SQLite table; [`MemoirHandle`] is the async,
//! cheaply-cloneable wrapper the HTTP handlers hold.

mod memoirs;
mod types;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub use memoirs::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MemoirStore};
pub use types::{ANONYMOUS_USER, Memoir, MemoirSummary, NewMemoir, word_count};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The request itself is unusable; nothing was written.
    #[error("invalid memoir: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("store io error: {0}")]
    Io(String),
    #[error("store task failed: {0}")]
    Join(String),
}

/// Async-safe handle to the memoir store.
///
/// Cheaply cloneable (`Arc`-backed). Every call runs on
/// `tokio::task::spawn_blocking` so handlers never block the executor.
#[derive(Debug, Clone)]
pub struct MemoirHandle {
    store: Arc<MemoirStore>,
}

impl MemoirHandle {
    pub fn new(store: MemoirStore) -> Self {
        Self { store: Arc::new(store) }
    }

    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        MemoirStore::open(db_path).map(Self::new)
    }

    pub async fn insert(&self, new: NewMemoir) -> Result<Memoir, StoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.insert(new))
            .await
            .map_err(|e| StoreError::Join(format!("insert join: {e}")))?
    }

    pub async fn get_and_count_view(&self, id: &str) -> Result<Option<Memoir>, StoreError> {
        let store = Arc::clone(&self.store);
        let id = id.to_string();
        tokio::task::spawn_blocking(move || store.get_and_count_view(&id))
            .await
            .map_err(|e| StoreError::Join(format!("get_and_count_view join: {e}")))?
    }

    pub async fn list_by_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoirSummary>, StoreError> {
        let store = Arc::clone(&self.store);
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || store.list_by_user(&user_id, limit))
            .await
            .map_err(|e| StoreError::Join(format!("list_by_user join: {e}")))?
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.count())
            .await
            .map_err(|e| StoreError::Join(format!("count join: {e}")))?
    }
}
