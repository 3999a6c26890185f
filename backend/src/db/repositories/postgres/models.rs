use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{attendance, bookings, tasks, users, workspaces};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::*;

fn corrupt_column(entity: &str, id: i64, message: String) -> RepositoryError {
    RepositoryError::internal_with_context(
        message,
        ErrorContext::new("decode_row")
            .with_entity(entity)
            .with_entity_id(id),
    )
}

// ==================== Users ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub uid: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            uid: row.uid,
            name: row.name,
            company_name: row.company_name,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub uid: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub role: String,
}

impl From<NewUser> for NewUserRow {
    fn from(user: NewUser) -> Self {
        Self {
            uid: user.uid,
            name: user.name,
            company_name: user.company_name,
            email: user.email,
            role: user.role,
        }
    }
}

// ==================== Workspaces ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkspaceRow {
    pub id: i64,
    pub name: String,
    pub workspace_type: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub zone: Option<String>,
    pub capacity: Option<i32>,
    pub amenities: Value,
    pub status: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WorkspaceRow> for Workspace {
    type Error = RepositoryError;

    fn try_from(row: WorkspaceRow) -> RepositoryResult<Self> {
        let workspace_type = row
            .workspace_type
            .parse()
            .map_err(|e| corrupt_column("workspace", row.id, e))?;
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt_column("workspace", row.id, e))?;
        let amenities: Vec<String> = serde_json::from_value(row.amenities)
            .map_err(|e| corrupt_column("workspace", row.id, format!("amenities: {}", e)))?;

        let location = if row.building.is_none() && row.floor.is_none() && row.zone.is_none() {
            None
        } else {
            Some(Location {
                building: row.building,
                floor: row.floor,
                zone: row.zone,
            })
        };

        Ok(Workspace {
            id: WorkspaceId(row.id),
            name: row.name,
            workspace_type,
            location,
            capacity: row.capacity.map(|c| c.max(0) as u32),
            amenities,
            status,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workspaces)]
pub struct NewWorkspaceRow {
    pub name: String,
    pub workspace_type: String,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub zone: Option<String>,
    pub capacity: Option<i32>,
    pub amenities: Value,
    pub status: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<NewWorkspace> for NewWorkspaceRow {
    fn from(ws: NewWorkspace) -> Self {
        let location = ws.location.unwrap_or_default();
        Self {
            name: ws.name.trim().to_string(),
            workspace_type: ws.workspace_type.as_str().to_string(),
            building: location.building,
            floor: location.floor,
            zone: location.zone,
            capacity: ws.capacity.map(|c| c.min(i32::MAX as u32) as i32),
            amenities: Value::from(ws.amenities),
            status: ws.status.as_str().to_string(),
            description: ws.description,
            is_active: ws.is_active,
        }
    }
}

// ==================== Bookings ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    pub id: i64,
    pub workspace_id: i64,
    pub user_uid: Option<String>,
    pub status: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = RepositoryError;

    fn try_from(row: BookingRow) -> RepositoryResult<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt_column("booking", row.id, e))?;
        Ok(Booking {
            id: BookingId(row.id),
            workspace_id: WorkspaceId(row.workspace_id),
            user_uid: row.user_uid,
            status,
            start_at: row.start_at,
            end_at: row.end_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct NewBookingRow {
    pub workspace_id: i64,
    pub user_uid: Option<String>,
    pub status: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<NewBooking> for NewBookingRow {
    fn from(booking: NewBooking) -> Self {
        Self {
            workspace_id: booking.workspace_id.value(),
            user_uid: booking.user_uid,
            status: booking.status.as_str().to_string(),
            start_at: booking.start_at,
            end_at: booking.end_at,
        }
    }
}

// ==================== Attendance ====================

/// Attendance columns are kept as raw text; readers decide what is usable.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttendanceRow {
    pub id: i64,
    pub user_uid: Option<String>,
    pub day: String,
    pub mode: String,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: AttendanceId(row.id),
            user_uid: row.user_uid,
            day: row.day,
            mode: row.mode,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attendance)]
pub struct NewAttendanceRow {
    pub user_uid: Option<String>,
    pub day: String,
    pub mode: String,
}

impl From<NewAttendance> for NewAttendanceRow {
    fn from(input: NewAttendance) -> Self {
        Self {
            user_uid: input.user_uid,
            day: day_key(input.day),
            mode: input.mode.as_str().to_string(),
        }
    }
}

// ==================== Tasks ====================

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub tag: String,
    pub due_date: Option<DateTime<Utc>>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> RepositoryResult<Self> {
        let status = row
            .status
            .parse()
            .map_err(|e| corrupt_column("task", row.id, e))?;
        Ok(Task {
            id: TaskId(row.id),
            user_id: UserId(row.user_id),
            title: row.title,
            description: row.description,
            status,
            tag: row.tag,
            due_date: row.due_date,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub tag: String,
    pub due_date: Option<DateTime<Utc>>,
    pub sort_order: i64,
}

impl From<NewTask> for NewTaskRow {
    fn from(task: NewTask) -> Self {
        Self {
            user_id: task.user_id.value(),
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_string(),
            tag: task.tag,
            due_date: task.due_date,
            sort_order: task.order,
        }
    }
}

/// Full-row changeset written back by `save_task`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub tag: String,
    pub due_date: Option<DateTime<Utc>>,
    pub sort_order: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskChangeset {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            tag: task.tag.clone(),
            due_date: task.due_date,
            sort_order: task.order,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub role: String,
}

impl From<&User> for UserChangeset {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            company_name: user.company_name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}
