//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::AnalyticsOptions;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for database operations
    pub repository: Arc<dyn FullRepository>,
    /// Knobs for the dashboard analytics pipeline
    pub analytics: AnalyticsOptions,
}

impl AppState {
    /// Create a new application state with default analytics options.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            analytics: AnalyticsOptions::default(),
        }
    }

    pub fn with_analytics_options(mut self, options: AnalyticsOptions) -> Self {
        self.analytics = options;
        self
    }
}
