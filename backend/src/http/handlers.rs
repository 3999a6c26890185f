//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Local;

use super::dto::{AnalyticsQuery, AttendanceQuery, CreateTaskRequest, TaskUpdateRequest};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AnalyticsResponse, AttendanceListResponse, AttendanceResponse, BookingListResponse,
    BookingResponse, HealthResponse, MessageResponse, TaskListResponse, TaskResponse,
    UserDeletedResponse, UserEnvelope, UserListResponse, UserRoleResponse,
    WorkspaceCreatedResponse, WorkspaceListResponse,
};
use crate::db::services as db_services;
use crate::models::{NewAttendance, NewBooking, NewUser, NewWorkspace, TaskId, User, UserId, UserUpdate};
use crate::routes::analytics::ANALYTICS_FAILED_MESSAGE;
use crate::routes::health::SERVER_RUNNING_MESSAGE;
use crate::routes::tasks::{
    TASK_DELETED_MESSAGE, TASK_NOT_FOUND_MESSAGE, TASK_TITLE_REQUIRED_MESSAGE,
    TASK_UNAUTHORIZED_MESSAGE, TASK_USER_NOT_FOUND_MESSAGE, USER_UID_HEADER,
};
use crate::routes::users::{
    NO_USERS_MESSAGE, USER_DELETED_MESSAGE, USER_NOT_DELETED_MESSAGE, USER_NOT_FOUND_MESSAGE,
};
use crate::services::{analytics, tasks, TaskServiceError};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers answering `201 Created`.
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        success: true,
        message: SERVER_RUNNING_MESSAGE.to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Dashboard Analytics
// =============================================================================

/// GET /dashboard/analytics?days=N
///
/// Any failure is logged and answered with one generic 500.
pub async fn get_analytics(
    State(state): State<AppState>,
    query: Result<Query<AnalyticsQuery>, QueryRejection>,
) -> HandlerResult<AnalyticsResponse> {
    let query = query.map(|Query(query)| query).unwrap_or_else(|rejection| {
        tracing::debug!("Ignoring analytics query string: {}", rejection.body_text());
        AnalyticsQuery::default()
    });
    let window_days = query.window_days();
    let today = Local::now().date_naive();

    analytics::get_latest_analytics(
        state.repository.as_ref(),
        window_days,
        today,
        &state.analytics,
    )
    .await
    .map(Json)
    .map_err(|e| {
        tracing::error!("Error fetching analytics ({} days): {}", window_days, e);
        AppError::Internal(ANALYTICS_FAILED_MESSAGE.to_string())
    })
}

// =============================================================================
// Workspaces & Bookings
// =============================================================================

/// POST /dashboard/workspace
pub async fn create_workspace(
    State(state): State<AppState>,
    payload: Result<Json<NewWorkspace>, JsonRejection>,
) -> HandlerResult<WorkspaceCreatedResponse> {
    let workspace = json_body(payload)?;
    let workspace = db_services::create_workspace(state.repository.as_ref(), workspace).await?;
    Ok(Json(WorkspaceCreatedResponse { workspace }))
}

/// GET /dashboard/workspaces
pub async fn list_workspaces(
    State(state): State<AppState>,
) -> HandlerResult<WorkspaceListResponse> {
    let workspaces = db_services::list_workspaces(state.repository.as_ref()).await?;
    Ok(Json(WorkspaceListResponse {
        success: true,
        workspaces,
    }))
}

/// POST /dashboard/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> CreatedResult<BookingResponse> {
    let booking = json_body(payload)?;
    let booking = db_services::create_booking(state.repository.as_ref(), booking).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            booking,
        }),
    ))
}

/// GET /dashboard/bookings
pub async fn list_bookings(State(state): State<AppState>) -> HandlerResult<BookingListResponse> {
    let bookings = db_services::list_bookings(state.repository.as_ref()).await?;
    Ok(Json(BookingListResponse {
        success: true,
        bookings,
    }))
}

// =============================================================================
// Attendance
// =============================================================================

/// POST /api/attendance
pub async fn record_attendance(
    State(state): State<AppState>,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> CreatedResult<AttendanceResponse> {
    let attendance = json_body(payload)?;
    let attendance = db_services::record_attendance(state.repository.as_ref(), attendance).await?;
    Ok((
        StatusCode::CREATED,
        Json(AttendanceResponse {
            success: true,
            attendance,
        }),
    ))
}

/// GET /api/attendance?day=YYYY-MM-DD
pub async fn list_attendance(
    State(state): State<AppState>,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> HandlerResult<AttendanceListResponse> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let day = query.parsed_day().map_err(AppError::BadRequest)?;
    let attendance = db_services::attendance_for_day(state.repository.as_ref(), day).await?;
    Ok(Json(AttendanceListResponse {
        success: true,
        attendance,
    }))
}

// =============================================================================
// Users
// =============================================================================

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> HandlerResult<UserListResponse> {
    let users = db_services::list_users(state.repository.as_ref()).await?;
    let message = users.is_empty().then(|| NO_USERS_MESSAGE.to_string());
    Ok(Json(UserListResponse {
        success: true,
        message,
        users,
    }))
}

/// GET /users/role/{email}
pub async fn get_user_role(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> HandlerResult<UserRoleResponse> {
    let user = db_services::user_by_email(state.repository.as_ref(), &email)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))?;
    Ok(Json(UserRoleResponse {
        success: true,
        role: user.role.clone(),
        user,
    }))
}

/// GET /users/{uid}
///
/// An unknown uid is not an error; the envelope carries `null`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> HandlerResult<UserEnvelope> {
    let users = db_services::user_by_uid(state.repository.as_ref(), &uid).await?;
    Ok(Json(UserEnvelope { users }))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> HandlerResult<UserEnvelope> {
    let user = json_body(payload)?;
    let user = db_services::create_user(state.repository.as_ref(), user).await?;
    Ok(Json(UserEnvelope { users: Some(user) }))
}

fn user_id(raw: &str, not_found: &str) -> Result<UserId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(not_found.to_string()))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> HandlerResult<UserEnvelope> {
    let id = user_id(&id, USER_NOT_FOUND_MESSAGE)?;
    let update = json_body(payload)?;
    let user = db_services::update_user(state.repository.as_ref(), id, update)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()))?;
    Ok(Json(UserEnvelope { users: Some(user) }))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<UserDeletedResponse> {
    let id = user_id(&id, USER_NOT_DELETED_MESSAGE)?;
    let user = db_services::delete_user(state.repository.as_ref(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(USER_NOT_DELETED_MESSAGE.to_string()))?;
    Ok(Json(UserDeletedResponse {
        message: USER_DELETED_MESSAGE.to_string(),
        users: user,
    }))
}

// =============================================================================
// Task Board
// =============================================================================

fn task_error(err: TaskServiceError, unknown_user: &str, failure: &str) -> AppError {
    match err {
        TaskServiceError::UnknownUser => AppError::Unauthorized(unknown_user.to_string()),
        TaskServiceError::MissingTitle => {
            AppError::BadRequest(TASK_TITLE_REQUIRED_MESSAGE.to_string())
        }
        TaskServiceError::TaskNotFound => AppError::NotFound(TASK_NOT_FOUND_MESSAGE.to_string()),
        TaskServiceError::InvalidDueDate(raw) => {
            AppError::BadRequest(format!("Invalid due date '{}'.", raw))
        }
        TaskServiceError::Repository(e) => {
            tracing::error!("{} {}", failure, e);
            AppError::Internal(failure.to_string())
        }
    }
}

async fn board_owner(
    state: &AppState,
    headers: &HeaderMap,
    unknown_user: &str,
    failure: &str,
) -> Result<User, AppError> {
    let uid = headers
        .get(USER_UID_HEADER)
        .and_then(|value| value.to_str().ok());
    tasks::resolve_user(state.repository.as_ref(), uid)
        .await
        .map_err(|e| task_error(e, unknown_user, failure))
}

fn task_id(raw: &str) -> Result<TaskId, AppError> {
    raw.parse()
        .map_err(|_| AppError::NotFound(TASK_NOT_FOUND_MESSAGE.to_string()))
}

/// GET /nestboard/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<TaskListResponse> {
    const FAILURE: &str = "Failed to load tasks.";
    let owner = board_owner(&state, &headers, TASK_USER_NOT_FOUND_MESSAGE, FAILURE).await?;
    let tasks = tasks::list_tasks(state.repository.as_ref(), &owner)
        .await
        .map_err(|e| task_error(e, TASK_USER_NOT_FOUND_MESSAGE, FAILURE))?;
    Ok(Json(TaskListResponse {
        success: true,
        tasks,
    }))
}

/// POST /nestboard/tasks
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> CreatedResult<TaskResponse> {
    const FAILURE: &str = "Failed to create task.";
    let owner = board_owner(&state, &headers, TASK_USER_NOT_FOUND_MESSAGE, FAILURE).await?;
    let draft = json_body(payload)?
        .into_draft()
        .map_err(|e| task_error(e, TASK_USER_NOT_FOUND_MESSAGE, FAILURE))?;
    let task = tasks::create_task(state.repository.as_ref(), &owner, draft)
        .await
        .map_err(|e| task_error(e, TASK_USER_NOT_FOUND_MESSAGE, FAILURE))?;
    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            task,
        }),
    ))
}

/// PATCH /nestboard/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdateRequest>, JsonRejection>,
) -> HandlerResult<TaskResponse> {
    const FAILURE: &str = "Failed to update task.";
    let owner = board_owner(&state, &headers, TASK_UNAUTHORIZED_MESSAGE, FAILURE).await?;
    let id = task_id(&id)?;
    let patch = json_body(payload)?
        .into_patch()
        .map_err(|e| task_error(e, TASK_UNAUTHORIZED_MESSAGE, FAILURE))?;
    let task = tasks::update_task(state.repository.as_ref(), &owner, id, patch)
        .await
        .map_err(|e| task_error(e, TASK_UNAUTHORIZED_MESSAGE, FAILURE))?;
    Ok(Json(TaskResponse {
        success: true,
        task,
    }))
}

/// DELETE /nestboard/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> HandlerResult<MessageResponse> {
    const FAILURE: &str = "Failed to delete task.";
    let owner = board_owner(&state, &headers, TASK_UNAUTHORIZED_MESSAGE, FAILURE).await?;
    let id = task_id(&id)?;
    tasks::delete_task(state.repository.as_ref(), &owner, id)
        .await
        .map_err(|e| task_error(e, TASK_UNAUTHORIZED_MESSAGE, FAILURE))?;
    Ok(Json(MessageResponse {
        success: true,
        message: TASK_DELETED_MESSAGE.to_string(),
    }))
}
