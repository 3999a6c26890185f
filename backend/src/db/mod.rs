//! Storage layer.
//!
//! Storage is reached through the repository pattern so the in-memory and
//! Postgres backends are interchangeable:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers / analytics & task services              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - logging of writes                                    │
//! │  - backend-independent lookups                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  Workspace / Booking / Attendance / User / Task         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Postgres (Diesel)│     │ Local (in-memory)       │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! Backends are created by [`RepositoryFactory`] / [`RepositoryBuilder`]
//! from environment variables or a `repository.toml` file. The server binary
//! holds the result in a process-wide singleton via [`init_repository`].

// Feature flag priority: postgres > local
#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    _private: (),
}

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AttendanceRepository, BookingRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult, TaskRepository, UserRepository, WorkspaceRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

/// Initialize the global repository from the environment.
///
/// A no-op when already initialized. Must be called from within a Tokio
/// runtime.
pub async fn init_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if let Some(repo) = REPOSITORY.get() {
        return Ok(repo);
    }

    let repo = RepositoryFactory::from_env()
        .await
        .map_err(|e| anyhow::Error::msg(e.to_string()))
        .context("Failed to initialize repository")?;
    Ok(REPOSITORY.get_or_init(|| repo))
}

/// The global repository, if [`init_repository`] has run.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    REPOSITORY
        .get()
        .context("Database not initialized. Call init_repository() first.")
}
