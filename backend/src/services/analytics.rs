//! Dashboard analytics aggregation.
//!
//! One request loads workspaces, confirmed bookings and attendance for a
//! window of consecutive days ending today, buckets them per calendar day and
//! derives the summary cards. Nothing is cached between requests.
//!
//! The pipeline is split into pure steps so each can be tested on its own:
//!
//! 1. [`day_range`] builds the window.
//! 2. [`partition_workspaces`] splits the loaded workspaces into desks and
//!    meeting rooms.
//! 3. [`bucket_desk_usage`], [`bucket_meeting_frequency`] and
//!    [`bucket_attendance`] produce the per-day series.
//! 4. [`summarize`] and [`group_by_location`] derive the rollups.
//!
//! [`get_latest_analytics`] wires the steps to a repository.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use log::debug;

use crate::api::{
    AnalyticsData, AnalyticsResponse, AnalyticsSummary, AttendanceDay, DeskUsageDay,
    MeetingFrequencyDay, OfficeLocationCount, SpaceTypeSlice,
};
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::db::services::load_workspaces_with_status;
use crate::models::{
    day_key, AttendanceMode, AttendanceRecord, Booking, Location, Workspace, WorkspaceId,
    WorkspaceType,
};
use crate::routes::analytics::{DESK_SLICE, MEETING_ROOM_SLICE, NO_BUSIEST_DAY};

/// Window length used when the request does not give a usable one.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Status value the workspace load filters on unless overridden.
///
/// Stored workspaces use `available`/`occupied`/`maintenance`, so this matches
/// nothing and the desk and meeting-room totals come out as zero. The value is
/// kept for compatibility with existing dashboards; see
/// [`AnalyticsOptions::from_env`].
pub const DEFAULT_WORKSPACE_STATUS_FILTER: &str = "active";

/// Environment variable overriding [`DEFAULT_WORKSPACE_STATUS_FILTER`].
pub const WORKSPACE_STATUS_ENV: &str = "ANALYTICS_WORKSPACE_STATUS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsOptions {
    /// Exact status string a workspace must carry to be counted.
    pub workspace_status: String,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            workspace_status: DEFAULT_WORKSPACE_STATUS_FILTER.to_string(),
        }
    }
}

impl AnalyticsOptions {
    /// Read [`WORKSPACE_STATUS_ENV`]; unset or blank keeps the default.
    pub fn from_env() -> Self {
        match std::env::var(WORKSPACE_STATUS_ENV) {
            Ok(value) if !value.trim().is_empty() => Self {
                workspace_status: value.trim().to_string(),
            },
            _ => Self::default(),
        }
    }

    pub fn with_workspace_status(mut self, status: impl Into<String>) -> Self {
        self.workspace_status = status.into();
        self
    }
}

// ==================== Day range ====================

/// `count` consecutive days ending at `today`, oldest first.
///
/// `count == 0` is an empty window. A window reaching past the earliest
/// representable date is rejected.
pub fn day_range(count: u32, today: NaiveDate) -> RepositoryResult<Vec<NaiveDate>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let first = today
        .checked_sub_days(Days::new(u64::from(count) - 1))
        .ok_or_else(|| {
            RepositoryError::validation_with_context(
                format!("A window of {} days ending {} is out of range", count, today),
                ErrorContext::new("day_range"),
            )
        })?;

    Ok(first.iter_days().take(count as usize).collect())
}

/// `[first 00:00:00.000, last 23:59:59.999]` in UTC, or `None` for an empty
/// window.
pub fn booking_window(days: &[NaiveDate]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = days.first()?;
    let last = days.last()?;
    let start = first.and_time(NaiveTime::MIN).and_utc();
    let end = last.and_hms_milli_opt(23, 59, 59, 999)?.and_utc();
    Some((start, end))
}

// ==================== Workspaces ====================

/// Desk and meeting-room ids among the loaded workspaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspacePartition {
    pub desk_ids: Vec<WorkspaceId>,
    pub room_ids: Vec<WorkspaceId>,
}

impl WorkspacePartition {
    pub fn total_desks(&self) -> usize {
        self.desk_ids.len()
    }

    pub fn total_meeting_rooms(&self) -> usize {
        self.room_ids.len()
    }
}

pub fn partition_workspaces(workspaces: &[Workspace]) -> WorkspacePartition {
    let mut partition = WorkspacePartition::default();
    for ws in workspaces {
        match ws.workspace_type {
            WorkspaceType::Desk => partition.desk_ids.push(ws.id),
            WorkspaceType::MeetingRoom => partition.room_ids.push(ws.id),
        }
    }
    partition
}

/// Count per `(building, floor, zone)` in first-seen order.
pub fn group_by_location(workspaces: &[Workspace]) -> Vec<OfficeLocationCount> {
    let mut index: HashMap<(String, String, String), usize> = HashMap::new();
    let mut groups: Vec<OfficeLocationCount> = Vec::new();

    for ws in workspaces {
        let key = Location::key(ws.location.as_ref());
        match index.get(&key) {
            Some(&slot) => groups[slot].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                let (building, floor, zone) = key;
                groups.push(OfficeLocationCount {
                    building,
                    floor,
                    zone,
                    count: 1,
                });
            }
        }
    }

    groups
}

pub fn space_type_distribution(partition: &WorkspacePartition) -> Vec<SpaceTypeSlice> {
    vec![
        SpaceTypeSlice {
            name: DESK_SLICE.to_string(),
            value: partition.total_desks(),
        },
        SpaceTypeSlice {
            name: MEETING_ROOM_SLICE.to_string(),
            value: partition.total_meeting_rooms(),
        },
    ]
}

// ==================== Per-day series ====================

// Multi-day bookings count once, on the day they start.
fn count_by_start_day(bookings: &[Booking]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for booking in bookings {
        *counts.entry(booking.start_day()).or_insert(0) += 1;
    }
    counts
}

pub fn bucket_desk_usage(
    days: &[NaiveDate],
    bookings: &[Booking],
    total_desks: usize,
) -> Vec<DeskUsageDay> {
    let counts = count_by_start_day(bookings);
    days.iter()
        .map(|day| DeskUsageDay {
            day: *day,
            booked: counts.get(day).copied().unwrap_or(0),
            total: total_desks,
        })
        .collect()
}

pub fn bucket_meeting_frequency(
    days: &[NaiveDate],
    bookings: &[Booking],
) -> Vec<MeetingFrequencyDay> {
    let counts = count_by_start_day(bookings);
    days.iter()
        .map(|day| MeetingFrequencyDay {
            day: *day,
            meetings: counts.get(day).copied().unwrap_or(0),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
struct ModeTally {
    office: usize,
    remote: usize,
}

/// One row per day of the window, zero-filled. Records outside the window or
/// with an unknown mode are skipped.
pub fn bucket_attendance(days: &[NaiveDate], records: &[AttendanceRecord]) -> Vec<AttendanceDay> {
    let mut tallies: BTreeMap<NaiveDate, ModeTally> =
        days.iter().map(|day| (*day, ModeTally::default())).collect();

    for record in records {
        let Some(tally) = record.parsed_day().and_then(|day| tallies.get_mut(&day)) else {
            continue;
        };
        match record.parsed_mode() {
            Some(AttendanceMode::Office) => tally.office += 1,
            Some(AttendanceMode::Remote) => tally.remote += 1,
            None => {}
        }
    }

    tallies
        .into_iter()
        .map(|(day, tally)| AttendanceDay {
            day,
            office: tally.office,
            remote: tally.remote,
        })
        .collect()
}

// ==================== Summary ====================

fn rounded_ratio(numerator: usize, denominator: usize) -> u64 {
    (numerator as f64 / denominator as f64).round() as u64
}

/// Derive the summary cards from the per-day series.
///
/// `busiest_day` is the earliest day holding the highest `booked` count.
pub fn summarize(
    desk_usage: &[DeskUsageDay],
    meetings: &[MeetingFrequencyDay],
    attendance: &[AttendanceDay],
) -> AnalyticsSummary {
    let total_booked: usize = desk_usage.iter().map(|d| d.booked).sum();
    let total_capacity: usize = desk_usage.iter().map(|d| d.total).sum();
    let avg_desk_occupancy = if total_capacity > 0 {
        (total_booked as f64 / total_capacity as f64 * 100.0).round() as u64
    } else {
        0
    };

    let total_meetings = meetings.iter().map(|m| m.meetings).sum();

    let avg_in_office = if attendance.is_empty() {
        0
    } else {
        let office: usize = attendance.iter().map(|a| a.office).sum();
        rounded_ratio(office, attendance.len())
    };

    // min_by_key keeps the first of equal keys
    let busiest_day = desk_usage
        .iter()
        .min_by_key(|d| Reverse(d.booked))
        .map(|d| day_key(d.day))
        .unwrap_or_else(|| NO_BUSIEST_DAY.to_string());

    AnalyticsSummary {
        avg_desk_occupancy,
        total_meetings,
        avg_in_office,
        busiest_day,
    }
}

// ==================== Pipeline ====================

async fn load_confirmed_bookings<R: FullRepository + ?Sized>(
    repo: &R,
    workspace_ids: &[WorkspaceId],
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> RepositoryResult<Vec<Booking>> {
    match window {
        Some((start, end)) => repo.find_confirmed_bookings(workspace_ids, start, end).await,
        None => Ok(Vec::new()),
    }
}

/// Compute the full analytics envelope for `window_days` days ending `today`.
///
/// Any storage failure aborts the whole computation.
pub async fn get_latest_analytics<R: FullRepository + ?Sized>(
    repo: &R,
    window_days: u32,
    today: NaiveDate,
    options: &AnalyticsOptions,
) -> RepositoryResult<AnalyticsResponse> {
    let days = day_range(window_days, today)?;
    let workspaces = load_workspaces_with_status(repo, &options.workspace_status).await?;
    let partition = partition_workspaces(&workspaces);

    let window = booking_window(&days);
    let day_keys: Vec<String> = days.iter().map(|d| day_key(*d)).collect();

    let (desk_bookings, room_bookings, attendance) = tokio::try_join!(
        load_confirmed_bookings(repo, &partition.desk_ids, window),
        load_confirmed_bookings(repo, &partition.room_ids, window),
        repo.find_attendance_by_days(&day_keys),
    )?;

    debug!(
        "Analytics window {} days: {} desks, {} rooms, {} desk bookings, {} meetings, {} attendance records",
        days.len(),
        partition.total_desks(),
        partition.total_meeting_rooms(),
        desk_bookings.len(),
        room_bookings.len(),
        attendance.len()
    );

    let desk_usage_by_day = bucket_desk_usage(&days, &desk_bookings, partition.total_desks());
    let meeting_frequency_by_day = bucket_meeting_frequency(&days, &room_bookings);
    let attendance_by_day = bucket_attendance(&days, &attendance);
    let summary = summarize(
        &desk_usage_by_day,
        &meeting_frequency_by_day,
        &attendance_by_day,
    );

    Ok(AnalyticsResponse {
        success: true,
        analytics: AnalyticsData {
            desk_usage_by_day,
            meeting_frequency_by_day,
            attendance_by_day,
            space_type_distribution: space_type_distribution(&partition),
            office_location: group_by_location(&workspaces),
        },
        summary,
    })
}
