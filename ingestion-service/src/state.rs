use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::services::catalog::PageSource;

pub type Source = Arc<dyn PageSource + Send + Sync>;

/// Shared handler state. Searches take `run_lock` so the snapshot file is
/// only ever written by one search at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: Config,
    source: Source,
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: Config, source: Source) -> Self {
        Self {
            inner: Arc::new(InnerState {
                config,
                source,
                run_lock: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn source(&self) -> &(dyn PageSource + Send + Sync) {
        self.inner.source.as_ref()
    }

    pub async fn lock_run(&self) -> MutexGuard<'_, ()> {
        self.inner.run_lock.lock().await
    }
}
