//! Repository construction from runtime configuration.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::PostgresConfig;

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel
    Postgres,
    /// In-memory
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts `postgres`, `pg` or `local`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` if set (unparsable values fall back to local),
    /// otherwise Postgres when a database URL is configured, otherwise local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration("Postgres repository feature not enabled")
}

/// Creates repository instances behind `Arc<dyn FullRepository>`.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use worknest::db::repository::WorkspaceRepository;
/// use worknest::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local, None).await.unwrap();
/// assert!(repo.health_check().await.unwrap());
/// # }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository of the given type. Postgres requires a config.
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn FullRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(postgres_disabled())
                }
            }
        }
    }

    /// Connect, build the pool and run pending migrations.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let config = config.clone();
        // Pool construction and migrations block on network I/O.
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository selected by [`RepositoryType::from_env`].
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_env()?.build().await
    }

    pub async fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new()
            .from_config_file(config_path)?
            .build()
            .await
    }

    /// Create the repository described by the first `repository.toml`
    /// found in the standard locations.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        RepositoryBuilder::new().from_default_config()?.build().await
    }
}

/// Fluent configuration for repository creation.
///
/// ```ignore
/// let repo = RepositoryBuilder::new()
///     .repository_type(RepositoryType::Postgres)
///     .postgres_config(PostgresConfig::from_env()?)
///     .build()
///     .await?;
/// ```
pub struct RepositoryBuilder {
    repo_type: RepositoryType,
    #[cfg(feature = "postgres-repo")]
    postgres_config: Option<PostgresConfig>,
}

impl RepositoryBuilder {
    /// Start from the environment-selected backend type.
    pub fn new() -> Self {
        Self {
            repo_type: RepositoryType::from_env(),
            #[cfg(feature = "postgres-repo")]
            postgres_config: None,
        }
    }

    pub fn repository_type(mut self, repo_type: RepositoryType) -> Self {
        self.repo_type = repo_type;
        self
    }

    #[cfg(feature = "postgres-repo")]
    pub fn postgres_config(mut self, config: PostgresConfig) -> Self {
        self.postgres_config = Some(config);
        self
    }

    /// Backend type and Postgres settings from environment variables.
    pub fn from_env(mut self) -> RepositoryResult<Self> {
        self.repo_type = RepositoryType::from_env();
        if self.repo_type == RepositoryType::Postgres {
            #[cfg(feature = "postgres-repo")]
            {
                let config = PostgresConfig::from_env().map_err(RepositoryError::configuration)?;
                self.postgres_config = Some(config);
            }
            #[cfg(not(feature = "postgres-repo"))]
            {
                return Err(postgres_disabled());
            }
        }
        Ok(self)
    }

    pub fn from_config_file<P: AsRef<Path>>(self, config_path: P) -> RepositoryResult<Self> {
        self.apply_config(RepositoryConfig::from_file(config_path)?)
    }

    pub fn from_default_config(self) -> RepositoryResult<Self> {
        self.apply_config(RepositoryConfig::from_default_location()?)
    }

    fn apply_config(mut self, config: RepositoryConfig) -> RepositoryResult<Self> {
        self.repo_type = config.repository_type()?;
        // Errors out for Postgres when the feature is disabled.
        let pg_config = config.to_postgres_config()?;
        #[cfg(feature = "postgres-repo")]
        {
            self.postgres_config = pg_config;
        }
        #[cfg(not(feature = "postgres-repo"))]
        let _ = pg_config;
        Ok(self)
    }

    pub async fn build(self) -> RepositoryResult<Arc<dyn FullRepository>> {
        #[cfg(feature = "postgres-repo")]
        let pg_config = self.postgres_config.as_ref();
        #[cfg(not(feature = "postgres-repo"))]
        let pg_config = None;

        RepositoryFactory::create(self.repo_type, pg_config).await
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
