use std::sync::Arc;

use crate::config::AppConfig;

/// Shared application state passed to all handlers via Axum's State extractor.
///
/// The engine is stateless, so this only carries configuration and uptime.
pub struct AppState {
    pub config: AppConfig,
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(AppState {
            config,
            start_time: std::time::Instant::now(),
        })
    }
}
