use std::sync::Arc;

use crate::services::executor::QueryRunner;
use crate::services::queries::QueryCatalog;

/// The query catalog and runner, built once at startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    catalog: QueryCatalog,
    runner: QueryRunner,
}

impl AppState {
    pub fn new(catalog: QueryCatalog, runner: QueryRunner) -> Self {
        Self {
            inner: Arc::new(InnerState { catalog, runner }),
        }
    }

    pub fn catalog(&self) -> &QueryCatalog {
        &self.inner.catalog
    }

    pub fn runner(&self) -> &QueryRunner {
        &self.inner.runner
    }
}
