//! Repository-agnostic write and lookup operations.
//!
//! These functions sit between the HTTP handlers and the repository traits.
//! They add the logging and the small bits of input shaping that must behave
//! the same on every backend.
//!
//! ```no_run
//! use worknest::db::{services, repositories::LocalRepository};
//! use worknest::models::{NewWorkspace, WorkspaceType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     services::create_workspace(&repo, NewWorkspace::new("D-1", WorkspaceType::Desk)).await?;
//!     println!("{} workspaces", services::list_workspaces(&repo).await?.len());
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{
    day_key, AttendanceRecord, Booking, NewAttendance, NewBooking, NewUser, NewWorkspace, User,
    UserId, UserUpdate, Workspace,
};

// ==================== Health ====================

pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Workspaces ====================

pub async fn create_workspace<R: FullRepository + ?Sized>(
    repo: &R,
    workspace: NewWorkspace,
) -> RepositoryResult<Workspace> {
    let created = repo.create_workspace(workspace).await?;
    info!(
        "Created {} workspace '{}' (id={})",
        created.workspace_type, created.name, created.id
    );
    Ok(created)
}

pub async fn list_workspaces<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Workspace>> {
    repo.list_workspaces().await
}

/// Workspaces whose stored status equals `status`.
///
/// A filter value outside the known status set is legal and simply matches
/// nothing; it is logged because the analytics load depends on it.
pub async fn load_workspaces_with_status<R: FullRepository + ?Sized>(
    repo: &R,
    status: &str,
) -> RepositoryResult<Vec<Workspace>> {
    let workspaces = repo.find_workspaces_by_status(status).await?;
    if workspaces.is_empty() && status.parse::<crate::models::WorkspaceStatus>().is_err() {
        warn!(
            "Workspace status filter '{}' is not a known status; no workspaces matched",
            status
        );
    }
    debug!("Loaded {} workspaces with status '{}'", workspaces.len(), status);
    Ok(workspaces)
}

// ==================== Bookings ====================

pub async fn create_booking<R: FullRepository + ?Sized>(
    repo: &R,
    booking: NewBooking,
) -> RepositoryResult<Booking> {
    let created = repo.create_booking(booking).await?;
    info!(
        "Created {} booking {} for workspace {}",
        created.status.as_str(),
        created.id,
        created.workspace_id
    );
    Ok(created)
}

pub async fn list_bookings<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Booking>> {
    repo.list_bookings().await
}

// ==================== Attendance ====================

pub async fn record_attendance<R: FullRepository + ?Sized>(
    repo: &R,
    attendance: NewAttendance,
) -> RepositoryResult<AttendanceRecord> {
    let stored = repo.record_attendance(attendance).await?;
    debug!("Recorded {} attendance for {}", stored.mode, stored.day);
    Ok(stored)
}

pub async fn attendance_for_day<R: FullRepository + ?Sized>(
    repo: &R,
    day: NaiveDate,
) -> RepositoryResult<Vec<AttendanceRecord>> {
    repo.find_attendance_by_days(&[day_key(day)]).await
}

// ==================== Users ====================

pub async fn list_users<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<User>> {
    repo.list_users().await
}

pub async fn user_by_uid<R: FullRepository + ?Sized>(
    repo: &R,
    uid: &str,
) -> RepositoryResult<Option<User>> {
    repo.find_user_by_uid(uid).await
}

pub async fn user_by_email<R: FullRepository + ?Sized>(
    repo: &R,
    email: &str,
) -> RepositoryResult<Option<User>> {
    repo.find_user_by_email(email).await
}

pub async fn create_user<R: FullRepository + ?Sized>(
    repo: &R,
    user: NewUser,
) -> RepositoryResult<User> {
    let created = repo.create_user(user).await?;
    info!("Created user {} (id={})", created.uid, created.id);
    Ok(created)
}

pub async fn update_user<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
    update: UserUpdate,
) -> RepositoryResult<Option<User>> {
    let updated = repo.update_user(id, update).await?;
    if updated.is_none() {
        debug!("Update for unknown user {}", id);
    }
    Ok(updated)
}

pub async fn delete_user<R: FullRepository + ?Sized>(
    repo: &R,
    id: UserId,
) -> RepositoryResult<Option<User>> {
    let deleted = repo.delete_user(id).await?;
    if let Some(user) = &deleted {
        info!("Deleted user {} (id={})", user.uid, user.id);
    }
    Ok(deleted)
}
