//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;
use crate::routes::{analytics, attendance, health, tasks, users, workspaces};

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Browser clients are served from other origins.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let dashboard = Router::new()
        .route(analytics::GET_ANALYTICS, get(handlers::get_analytics))
        .route(workspaces::POST_WORKSPACE, post(handlers::create_workspace))
        .route(workspaces::LIST_WORKSPACES, get(handlers::list_workspaces))
        .route(
            workspaces::BOOKINGS,
            get(handlers::list_bookings).post(handlers::create_booking),
        )
        .route(
            attendance::ATTENDANCE,
            get(handlers::list_attendance).post(handlers::record_attendance),
        );

    let people = Router::new()
        .route(
            users::USERS,
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(users::USER_ROLE_BY_EMAIL, get(handlers::get_user_role))
        .route(
            users::USER_BY_KEY,
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            tasks::TASKS,
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            tasks::TASK_BY_ID,
            patch(handlers::update_task).delete(handlers::delete_task),
        );

    Router::new()
        .route(health::HEALTH, get(handlers::health_check))
        .merge(dashboard)
        .merge(people)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
