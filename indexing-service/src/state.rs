use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::models::storage::SqliteStore;

/// Handler state. Replacements take `write_lock`, so two searches never
/// interleave their clear and insert steps.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: SqliteStore,
    write_lock: Mutex<()>,
    /// Completion time of the most recent successful replace.
    last_update: RwLock<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            inner: Arc::new(InnerState {
                store,
                write_lock: Mutex::new(()),
                last_update: RwLock::new(None),
            }),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.inner.store
    }

    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.inner.write_lock.lock().await
    }

    pub async fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_update.read().await
    }

    pub async fn mark_updated(&self, at: DateTime<Utc>) {
        *self.inner.last_update.write().await = Some(at);
    }
}
