//! Tests for db::factory and db::repo_config - repository creation and configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use worknest::db::factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
use worknest::db::repository::WorkspaceRepository;
use worknest::db::RepositoryConfig;

#[test]
fn test_repository_type_from_str() {
    assert_eq!(RepositoryType::from_str("postgres").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("PG").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str(" Local ").unwrap(), RepositoryType::Local);

    let result = RepositoryType::from_str("mongo");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/worknest")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres),
    );
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", Some("postgres://localhost/worknest")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres),
    );
}

#[test]
fn test_explicit_repository_type_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/worknest")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[tokio::test]
async fn test_factory_creates_local() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
    assert!(repo.list_workspaces().await.unwrap().is_empty());
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_factory_postgres_without_feature_is_config_error() {
    let err = RepositoryFactory::create(RepositoryType::Postgres, None)
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("not enabled"));
}

#[tokio::test]
async fn test_builder_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"local\"").unwrap();

    let repo = RepositoryBuilder::new()
        .from_config_file(file.path())
        .unwrap()
        .build()
        .await
        .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[test]
fn test_config_parse_fills_postgres_defaults() {
    let config = RepositoryConfig::parse(
        r#"
        [repository]
        type = "postgres"

        [postgres]
        database_url = "postgres://worknest@localhost/worknest"
        max_connections = 4
        "#,
    )
    .unwrap();

    assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
    assert_eq!(config.postgres.max_connections, 4);
    assert_eq!(config.postgres.min_connections, 1);
    assert_eq!(config.postgres.max_retries, 3);
}

#[test]
fn test_config_rejects_unknown_type() {
    let config = RepositoryConfig::parse("[repository]\ntype = \"mongo\"\n").unwrap();
    assert!(config.repository_type().is_err());
    assert!(RepositoryConfig::parse("not toml at all [").is_err());
}

#[test]
fn test_bundled_config_file_parses() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("repository.toml");
    let config = RepositoryConfig::from_file(path).unwrap();
    assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    assert_eq!(config.postgres.idle_timeout, 600);
}
