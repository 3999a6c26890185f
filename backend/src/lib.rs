//! # WorkNest Backend
//!
//! Hybrid-workplace analytics and workspace management service.
//!
//! This crate powers the WorkNest dashboard: it stores workspaces (desks and
//! meeting rooms), bookings, daily attendance check-ins, users and a personal
//! task board, and aggregates them into the rolling-window analytics the
//! dashboard charts. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Dashboard Analytics**: desk occupancy, meeting frequency and
//!   office/remote attendance per day over a trailing window, plus summary
//!   cards and location rollups
//! - **Workspace & Booking Records**: create and list workspaces and bookings
//! - **Attendance**: record and query daily check-ins
//! - **Users & Task Board**: profile CRUD and a per-user kanban board
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain entities and strongly typed identifiers
//! - [`api`]: Data Transfer Objects (DTOs) for API responses
//! - [`db`]: Repository pattern, persistence backends and configuration
//! - [`services`]: Analytics aggregation and task-board rules
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`routes`]: Route-specific response types and endpoint paths
//!
//! ## Example
//!
//! ```no_run
//! use worknest::db::repositories::LocalRepository;
//! use worknest::services::{get_latest_analytics, AnalyticsOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let today = chrono::Local::now().date_naive();
//!     let report = get_latest_analytics(&repo, 7, today, &AnalyticsOptions::default()).await?;
//!     println!("busiest day: {}", report.summary.busiest_day);
//!     Ok(())
//! }
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
