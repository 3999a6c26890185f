//! Business logic on top of the repository traits.

pub mod analytics;
pub mod tasks;

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod analytics_tests;

pub use analytics::{get_latest_analytics, AnalyticsOptions, DEFAULT_WINDOW_DAYS};
pub use tasks::{TaskDraft, TaskServiceError};
