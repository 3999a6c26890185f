//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use worknest::db::repositories::LocalRepository;
use worknest::db::repository::{BookingRepository, UserRepository, WorkspaceRepository};
use worknest::models::{
    Booking, Location, NewBooking, NewUser, NewWorkspace, User, Workspace, WorkspaceId,
    WorkspaceStatus, WorkspaceType,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the variables on unwind and serializes access to the process
/// environment, since tests run in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// ==================== Fixtures ====================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(day: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
}

pub fn location(building: &str, floor: &str, zone: &str) -> Location {
    Location {
        building: Some(building.to_string()),
        floor: Some(floor.to_string()),
        zone: Some(zone.to_string()),
    }
}

pub async fn add_desks(repo: &LocalRepository, count: usize, status: WorkspaceStatus) -> Vec<Workspace> {
    let mut desks = Vec::with_capacity(count);
    for i in 0..count {
        let desk = repo
            .create_workspace(
                NewWorkspace::new(format!("Desk {}", i + 1), WorkspaceType::Desk)
                    .with_location(location("HQ", "1", "East"))
                    .with_status(status),
            )
            .await
            .unwrap();
        desks.push(desk);
    }
    desks
}

pub async fn add_room(repo: &LocalRepository, name: &str, capacity: u32) -> Workspace {
    repo.create_workspace(
        NewWorkspace::new(name, WorkspaceType::MeetingRoom)
            .with_location(location("HQ", "2", "West"))
            .with_capacity(capacity),
    )
    .await
    .unwrap()
}

pub async fn book(
    repo: &LocalRepository,
    workspace: WorkspaceId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Booking {
    repo.create_booking(NewBooking::confirmed(workspace, start, end))
        .await
        .unwrap()
}

pub async fn add_user(repo: &LocalRepository, uid: &str, email: &str) -> User {
    repo.create_user(NewUser {
        uid: uid.to_string(),
        name: "Test User".to_string(),
        email: email.to_string(),
        role: "admin".to_string(),
        company_name: "WorkNest".to_string(),
    })
    .await
    .unwrap()
}
