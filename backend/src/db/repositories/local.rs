//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. Entities live in
//! insertion-ordered vectors behind a single lock, which keeps query results
//! deterministic across runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::*;

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same underlying data.
///
/// # Example
/// ```
/// use worknest::db::repositories::LocalRepository;
/// use worknest::db::repository::WorkspaceRepository;
/// use worknest::models::{NewWorkspace, WorkspaceType};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// repo.create_workspace(NewWorkspace::new("D-1", WorkspaceType::Desk))
///     .await
///     .unwrap();
/// assert_eq!(repo.list_workspaces().await.unwrap().len(), 1);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    workspaces: Vec<Workspace>,
    bookings: Vec<Booking>,
    attendance: Vec<AttendanceRecord>,
    users: Vec<User>,
    tasks: Vec<Task>,

    // ID counters, shared across entity kinds
    next_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            workspaces: Vec::new(),
            bookings: Vec::new(),
            attendance: Vec::new(),
            users: Vec::new(),
            tasks: Vec::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation except `health_check` fails with a
    /// retryable connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Insert an attendance record verbatim, bypassing input validation.
    ///
    /// Lets tests seed the malformed rows that legacy writers produced.
    pub fn insert_raw_attendance(&self, day: &str, mode: &str) -> AttendanceRecord {
        let mut data = self.data.write();
        let record = AttendanceRecord {
            id: AttendanceId(data.allocate_id()),
            user_uid: None,
            day: day.to_string(),
            mode: mode.to_string(),
            created_at: Utc::now(),
        };
        data.attendance.push(record.clone());
        record
    }

    pub fn workspace_count(&self) -> usize {
        self.data.read().workspaces.len()
    }

    pub fn booking_count(&self) -> usize {
        self.data.read().bookings.len()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> RepositoryResult<Workspace> {
        self.check_health("create_workspace")?;
        workspace.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_workspace").with_entity("workspace"),
            )
        })?;

        let mut data = self.data.write();
        let id = WorkspaceId(data.allocate_id());
        let stored = workspace.into_workspace(id, Utc::now());
        data.workspaces.push(stored.clone());
        Ok(stored)
    }

    async fn list_workspaces(&self) -> RepositoryResult<Vec<Workspace>> {
        self.check_health("list_workspaces")?;
        Ok(self.data.read().workspaces.clone())
    }

    async fn get_workspace(&self, id: WorkspaceId) -> RepositoryResult<Workspace> {
        self.check_health("get_workspace")?;
        self.data
            .read()
            .workspaces
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::entity_not_found("Workspace", id))
    }

    async fn find_workspaces_by_status(&self, status: &str) -> RepositoryResult<Vec<Workspace>> {
        self.check_health("find_workspaces_by_status")?;
        Ok(self
            .data
            .read()
            .workspaces
            .iter()
            .filter(|w| w.status.as_str() == status)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn create_booking(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        self.check_health("create_booking")?;
        booking.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_booking").with_entity("booking"),
            )
        })?;

        let mut data = self.data.write();
        if !data.workspaces.iter().any(|w| w.id == booking.workspace_id) {
            return Err(RepositoryError::entity_not_found(
                "Workspace",
                booking.workspace_id,
            ));
        }
        let id = BookingId(data.allocate_id());
        let stored = booking.into_booking(id, Utc::now());
        data.bookings.push(stored.clone());
        Ok(stored)
    }

    async fn list_bookings(&self) -> RepositoryResult<Vec<Booking>> {
        self.check_health("list_bookings")?;
        Ok(self.data.read().bookings.clone())
    }

    async fn find_confirmed_bookings(
        &self,
        workspace_ids: &[WorkspaceId],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Booking>> {
        self.check_health("find_confirmed_bookings")?;
        Ok(self
            .data
            .read()
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .filter(|b| workspace_ids.contains(&b.workspace_id))
            .filter(|b| b.overlaps(window_start, window_end))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttendanceRepository for LocalRepository {
    async fn record_attendance(
        &self,
        attendance: NewAttendance,
    ) -> RepositoryResult<AttendanceRecord> {
        self.check_health("record_attendance")?;
        let mut data = self.data.write();
        let id = AttendanceId(data.allocate_id());
        let stored = attendance.into_record(id, Utc::now());
        data.attendance.push(stored.clone());
        Ok(stored)
    }

    async fn find_attendance_by_days(
        &self,
        days: &[String],
    ) -> RepositoryResult<Vec<AttendanceRecord>> {
        self.check_health("find_attendance_by_days")?;
        Ok(self
            .data
            .read()
            .attendance
            .iter()
            .filter(|a| days.contains(&a.day))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.check_health("list_users")?;
        Ok(self.data.read().users.clone())
    }

    async fn find_user_by_uid(&self, uid: &str) -> RepositoryResult<Option<User>> {
        self.check_health("find_user_by_uid")?;
        Ok(self.data.read().users.iter().find(|u| u.uid == uid).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        self.check_health("find_user_by_email")?;
        Ok(self
            .data
            .read()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        self.check_health("create_user")?;
        user.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_user").with_entity("user"),
            )
        })?;

        let mut data = self.data.write();
        let id = UserId(data.allocate_id());
        let stored = user.into_user(id, Utc::now());
        data.users.push(stored.clone());
        Ok(stored)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> RepositoryResult<Option<User>> {
        self.check_health("update_user")?;
        update.validate().map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("update_user")
                    .with_entity("user")
                    .with_entity_id(id),
            )
        })?;

        let mut data = self.data.write();
        Ok(data.users.iter_mut().find(|u| u.id == id).map(|user| {
            update.apply(user);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        self.check_health("delete_user")?;
        let mut data = self.data.write();
        let position = data.users.iter().position(|u| u.id == id);
        Ok(position.map(|idx| data.users.remove(idx)))
    }
}

#[async_trait]
impl TaskRepository for LocalRepository {
    async fn list_tasks_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Task>> {
        self.check_health("list_tasks_for_user")?;
        let mut tasks: Vec<Task> = self
            .data
            .read()
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(Task::board_cmp);
        Ok(tasks)
    }

    async fn max_task_order(
        &self,
        user_id: UserId,
        status: TaskStatus,
    ) -> RepositoryResult<Option<i64>> {
        self.check_health("max_task_order")?;
        Ok(self
            .data
            .read()
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id && t.status == status)
            .map(|t| t.order)
            .max())
    }

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task> {
        self.check_health("create_task")?;
        let mut data = self.data.write();
        let id = TaskId(data.allocate_id());
        let stored = task.into_task(id, Utc::now());
        data.tasks.push(stored.clone());
        Ok(stored)
    }

    async fn find_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>> {
        self.check_health("find_task_for_user")?;
        Ok(self
            .data
            .read()
            .tasks
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    async fn save_task(&self, task: &Task) -> RepositoryResult<Task> {
        self.check_health("save_task")?;
        let mut data = self.data.write();
        let slot = data
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| RepositoryError::entity_not_found("Task", task.id))?;
        *slot = task.clone();
        Ok(task.clone())
    }

    async fn delete_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>> {
        self.check_health("delete_task_for_user")?;
        let mut data = self.data.write();
        let position = data
            .tasks
            .iter()
            .position(|t| t.id == id && t.user_id == user_id);
        Ok(position.map(|idx| data.tasks.remove(idx)))
    }
}
