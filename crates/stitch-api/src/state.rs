//! Application state.

use std::sync::Arc;

use stitch_storage::StorageResult;
use stitch_worker::JobContext;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub jobs: Arc<JobContext>,
}

impl AppState {
    /// Create new application state from the environment.
    pub fn new(config: ApiConfig) -> StorageResult<Self> {
        Ok(Self {
            config,
            jobs: Arc::new(JobContext::from_env()?),
        })
    }
}
