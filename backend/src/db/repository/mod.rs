//! Repository trait definitions for storage operations.
//!
//! Storage is split into focused traits, one per entity family, so that
//! services only depend on what they read and test doubles stay small.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`workspace`]: Workspaces plus the connection health check
//! - [`booking`]: Workspace reservations
//! - [`attendance`]: Daily office/remote check-ins
//! - [`user`]: User profiles
//! - [`task`]: Personal task board
//!
//! # Convenience Trait Bound
//!
//! Code that needs everything can take a [`FullRepository`]:
//!
//! ```ignore
//! async fn dashboard<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let workspaces = repo.list_workspaces().await?;
//!     let attendance = repo.find_attendance_by_days(&days).await?;
//!     Ok(())
//! }
//! ```

pub mod attendance;
pub mod booking;
pub mod error;
pub mod task;
pub mod user;
pub mod workspace;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use attendance::AttendanceRepository;
pub use booking::BookingRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Implemented automatically for any type that implements all five
/// repository traits.
pub trait FullRepository:
    WorkspaceRepository + BookingRepository + AttendanceRepository + UserRepository + TaskRepository
{
}

impl<T> FullRepository for T where
    T: WorkspaceRepository
        + BookingRepository
        + AttendanceRepository
        + UserRepository
        + TaskRepository
{
}
