//! Public API surface for the WorkNest backend.
//!
//! This file consolidates the response envelopes of the HTTP API together
//! with the domain entities they carry. All types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::routes::analytics::AnalyticsData;
pub use crate::routes::analytics::AnalyticsResponse;
pub use crate::routes::analytics::AnalyticsSummary;
pub use crate::routes::analytics::AttendanceDay;
pub use crate::routes::analytics::DeskUsageDay;
pub use crate::routes::analytics::MeetingFrequencyDay;
pub use crate::routes::analytics::OfficeLocationCount;
pub use crate::routes::analytics::SpaceTypeSlice;
pub use crate::routes::attendance::AttendanceListResponse;
pub use crate::routes::attendance::AttendanceResponse;
pub use crate::routes::health::HealthResponse;
pub use crate::routes::health::MessageResponse;
pub use crate::routes::tasks::TaskListResponse;
pub use crate::routes::tasks::TaskResponse;
pub use crate::routes::users::UserDeletedResponse;
pub use crate::routes::users::UserEnvelope;
pub use crate::routes::users::UserListResponse;
pub use crate::routes::users::UserRoleResponse;
pub use crate::routes::workspaces::BookingListResponse;
pub use crate::routes::workspaces::BookingResponse;
pub use crate::routes::workspaces::WorkspaceCreatedResponse;
pub use crate::routes::workspaces::WorkspaceListResponse;

pub use crate::models::{
    AttendanceId, AttendanceMode, AttendanceRecord, Booking, BookingId, BookingStatus, Location,
    NewAttendance, NewBooking, NewTask, NewUser, NewWorkspace, Task, TaskId, TaskPatch,
    TaskStatus, User, UserId, UserUpdate, Workspace, WorkspaceId, WorkspaceStatus, WorkspaceType,
};
