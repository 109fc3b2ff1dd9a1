use tracing_appender::non_blocking::WorkerGuard;

use crate::infra::{config::AppConfig, storage_layout::StorageLayout};

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    /// `None` when no config directory could be resolved; nothing is persisted then.
    pub storage: Option<StorageLayout>,
    log_guard: Option<WorkerGuard>,
}

impl AppContext {
    pub fn new(config: AppConfig, storage: Option<StorageLayout>) -> Self {
        Self {
            config,
            storage,
            log_guard: None,
        }
    }

    pub fn keep_log_guard(&mut self, guard: WorkerGuard) {
        self.log_guard = Some(guard);
    }

    pub fn has_log_file(&self) -> bool {
        self.log_guard.is_some()
    }
}
