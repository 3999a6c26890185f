//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::db::repository::*;
use crate::models::*;

mod models;
mod schema;

use models::*;
use schema::{attendance, bookings, tasks, users, workspaces};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset or unparsable numeric variables fall back to the defaults.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        })
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub total_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation on the blocking pool, retrying transient
    /// failures with exponential backoff up to `max_retries` times.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    retried_operations.fetch_add(1, Ordering::Relaxed);
                    log::warn!(
                        "Retrying {} (attempt {}/{})",
                        operation,
                        attempt + 1,
                        max_retries + 1
                    );
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2;
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new(operation)
                                .with_details(format!("attempt={}", attempt + 1)),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                };

                total_queries.fetch_add(1, Ordering::Relaxed);
                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e.with_operation(operation));
                    }
                }
            }

            failed_queries.fetch_add(1, Ordering::Relaxed);
            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }

    pub async fn is_healthy(&self) -> bool {
        self.health_check().await.unwrap_or(false)
    }

    /// Returns `(is_healthy, latency_ms, error_message)`.
    pub async fn health_check_detailed(&self) -> (bool, Option<u64>, Option<String>) {
        let start = Instant::now();
        let result = self.health_check().await;
        let latency = Some(start.elapsed().as_millis() as u64);
        match result {
            Ok(true) => (true, latency, None),
            Ok(false) => (false, latency, Some("Health check returned false".to_string())),
            Err(e) => (false, latency, Some(e.to_string())),
        }
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn decode_all<R, T>(rows: Vec<R>) -> RepositoryResult<Vec<T>>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// ==================== Workspaces ====================

#[async_trait]
impl WorkspaceRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> RepositoryResult<Workspace> {
        workspace.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_workspace").with_entity("workspace"),
            )
        })?;
        let row = NewWorkspaceRow::from(workspace);

        let inserted = self
            .with_conn("create_workspace", move |conn| {
                diesel::insert_into(workspaces::table)
                    .values(&row)
                    .returning(WorkspaceRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Workspace::try_from(inserted)
    }

    async fn list_workspaces(&self) -> RepositoryResult<Vec<Workspace>> {
        let rows = self
            .with_conn("list_workspaces", |conn| {
                workspaces::table
                    .order(workspaces::id.asc())
                    .select(WorkspaceRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        decode_all(rows)
    }

    async fn get_workspace(&self, id: WorkspaceId) -> RepositoryResult<Workspace> {
        let row = self
            .with_conn("get_workspace", move |conn| {
                workspaces::table
                    .find(id.value())
                    .select(WorkspaceRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        match row {
            Some(row) => Workspace::try_from(row),
            None => Err(RepositoryError::entity_not_found("Workspace", id)),
        }
    }

    async fn find_workspaces_by_status(&self, status: &str) -> RepositoryResult<Vec<Workspace>> {
        let status = status.to_string();
        let rows = self
            .with_conn("find_workspaces_by_status", move |conn| {
                workspaces::table
                    .filter(workspaces::status.eq(&status))
                    .order(workspaces::id.asc())
                    .select(WorkspaceRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        decode_all(rows)
    }
}

// ==================== Bookings ====================

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn create_booking(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        booking.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_booking").with_entity("booking"),
            )
        })?;
        let workspace_id = booking.workspace_id;
        let row = NewBookingRow::from(booking);

        let inserted = self
            .with_conn("create_booking", move |conn| {
                conn.transaction(|tx| {
                    let exists: bool = diesel::select(diesel::dsl::exists(
                        workspaces::table.find(workspace_id.value()),
                    ))
                    .get_result(tx)
                    .map_err(map_diesel_error)?;
                    if !exists {
                        return Err(RepositoryError::entity_not_found("Workspace", workspace_id));
                    }

                    diesel::insert_into(bookings::table)
                        .values(&row)
                        .returning(BookingRow::as_returning())
                        .get_result(tx)
                        .map_err(map_diesel_error)
                })
            })
            .await?;
        Booking::try_from(inserted)
    }

    async fn list_bookings(&self) -> RepositoryResult<Vec<Booking>> {
        let rows = self
            .with_conn("list_bookings", |conn| {
                bookings::table
                    .order(bookings::id.asc())
                    .select(BookingRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        decode_all(rows)
    }

    async fn find_confirmed_bookings(
        &self,
        workspace_ids: &[WorkspaceId],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Booking>> {
        if workspace_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = workspace_ids.iter().map(WorkspaceId::value).collect();

        let rows = self
            .with_conn("find_confirmed_bookings", move |conn| {
                bookings::table
                    .filter(bookings::status.eq(BookingStatus::Confirmed.as_str()))
                    .filter(bookings::workspace_id.eq_any(ids))
                    .filter(bookings::start_at.le(window_end))
                    .filter(bookings::end_at.ge(window_start))
                    .order(bookings::start_at.asc())
                    .select(BookingRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        decode_all(rows)
    }
}

// ==================== Attendance ====================

#[async_trait]
impl AttendanceRepository for PostgresRepository {
    async fn record_attendance(
        &self,
        attendance: NewAttendance,
    ) -> RepositoryResult<AttendanceRecord> {
        let row = NewAttendanceRow::from(attendance);
        let inserted = self
            .with_conn("record_attendance", move |conn| {
                diesel::insert_into(attendance::table)
                    .values(&row)
                    .returning(AttendanceRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(inserted.into())
    }

    async fn find_attendance_by_days(
        &self,
        days: &[String],
    ) -> RepositoryResult<Vec<AttendanceRecord>> {
        if days.is_empty() {
            return Ok(Vec::new());
        }
        let days = days.to_vec();
        let rows = self
            .with_conn("find_attendance_by_days", move |conn| {
                attendance::table
                    .filter(attendance::day.eq_any(days))
                    .order(attendance::id.asc())
                    .select(AttendanceRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }
}

// ==================== Users ====================

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let rows = self
            .with_conn("list_users", |conn| {
                users::table
                    .order(users::id.asc())
                    .select(UserRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user_by_uid(&self, uid: &str) -> RepositoryResult<Option<User>> {
        let uid = uid.to_string();
        let row = self
            .with_conn("find_user_by_uid", move |conn| {
                users::table
                    .filter(users::uid.eq(&uid))
                    .select(UserRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = email.to_string();
        let row = self
            .with_conn("find_user_by_email", move |conn| {
                users::table
                    .filter(users::email.eq(&email))
                    .order(users::id.asc())
                    .select(UserRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        user.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_user").with_entity("user"),
            )
        })?;
        let row = NewUserRow::from(user);
        let inserted = self
            .with_conn("create_user", move |conn| {
                diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(inserted.into())
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> RepositoryResult<Option<User>> {
        update.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("update_user")
                    .with_entity("user")
                    .with_entity_id(id),
            )
        })?;

        self.with_conn("update_user", move |conn| {
            conn.transaction(|tx| {
                let current = users::table
                    .find(id.value())
                    .select(UserRow::as_select())
                    .first(tx)
                    .optional()
                    .map_err(map_diesel_error)?;
                let Some(current) = current else {
                    return Ok(None);
                };

                let mut user = User::from(current);
                update.clone().apply(&mut user);
                diesel::update(users::table.find(id.value()))
                    .set(UserChangeset::from(&user))
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                Ok(Some(user))
            })
        })
        .await
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let row = self
            .with_conn("delete_user", move |conn| {
                diesel::delete(users::table.find(id.value()))
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        Ok(row.map(User::from))
    }
}

// ==================== Tasks ====================

#[async_trait]
impl TaskRepository for PostgresRepository {
    async fn list_tasks_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        let rows = self
            .with_conn("list_tasks_for_user", move |conn| {
                tasks::table
                    .filter(tasks::user_id.eq(user_id.value()))
                    .order((
                        tasks::status.asc(),
                        tasks::sort_order.asc(),
                        tasks::created_at.desc(),
                    ))
                    .select(TaskRow::as_select())
                    .load(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        decode_all(rows)
    }

    async fn max_task_order(
        &self,
        user_id: UserId,
        status: TaskStatus,
    ) -> RepositoryResult<Option<i64>> {
        self.with_conn("max_task_order", move |conn| {
            tasks::table
                .filter(tasks::user_id.eq(user_id.value()))
                .filter(tasks::status.eq(status.as_str()))
                .select(diesel::dsl::max(tasks::sort_order))
                .first::<Option<i64>>(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task> {
        let row = NewTaskRow::from(task);
        let inserted = self
            .with_conn("create_task", move |conn| {
                diesel::insert_into(tasks::table)
                    .values(&row)
                    .returning(TaskRow::as_returning())
                    .get_result(conn)
                    .map_err(map_diesel_error)
            })
            .await?;
        Task::try_from(inserted)
    }

    async fn find_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>> {
        let row = self
            .with_conn("find_task_for_user", move |conn| {
                tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .filter(tasks::user_id.eq(user_id.value()))
                    .select(TaskRow::as_select())
                    .first(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn save_task(&self, task: &Task) -> RepositoryResult<Task> {
        let id = task.id;
        let changes = TaskChangeset::from(task);
        let row = self
            .with_conn("save_task", move |conn| {
                diesel::update(tasks::table.find(id.value()))
                    .set(&changes)
                    .returning(TaskRow::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;
        match row {
            Some(row) => Task::try_from(row),
            None => Err(RepositoryError::entity_not_found("Task", id)),
        }
    }

    async fn delete_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>> {
        let row = self
            .with_conn("delete_task_for_user", move |conn| {
                diesel::delete(
                    tasks::table
                        .filter(tasks::id.eq(id.value()))
                        .filter(tasks::user_id.eq(user_id.value())),
                )
                .returning(TaskRow::as_returning())
                .get_result(conn)
                .optional()
                .map_err(map_diesel_error)
            })
            .await?;
        row.map(Task::try_from).transpose()
    }
}
