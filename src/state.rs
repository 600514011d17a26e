use crate::config::AppConfig;
use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::black_scholes::BlackScholes;
use std::sync::Arc;

// ── Application shared state (passed to every handler, no globals) ──

pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub engine: BlackScholes,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            engine: BlackScholes::new(),
        })
    }

    /// Run a store operation on the blocking pool, bounded by `db_timeout`.
    /// SQLite calls are synchronous; keeping them off the async workers means
    /// a slow disk never stalls unrelated requests.
    pub async fn with_store<T, F>(&self, op: F) -> AppResult<T>
    where
        F: FnOnce(&Store) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        let task = tokio::task::spawn_blocking(move || op(&store));
        match tokio::time::timeout(self.config.db_timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => Err(AppError::Storage(format!(
                "store operation timed out after {} ms",
                self.config.db_timeout.as_millis()
            ))),
        }
    }
}
