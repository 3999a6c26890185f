use chrono::{NaiveDate, TimeZone, Utc};

use crate::api::{AttendanceDay, DeskUsageDay, MeetingFrequencyDay};
use crate::db::repositories::LocalRepository;
use crate::db::repository::{BookingRepository, WorkspaceRepository};
use crate::models::*;
use crate::services::analytics::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn booking(id: i64, workspace: i64, start: (u32, u32), end: (u32, u32)) -> Booking {
    Booking {
        id: BookingId(id),
        workspace_id: WorkspaceId(workspace),
        user_uid: None,
        status: BookingStatus::Confirmed,
        start_at: Utc.with_ymd_and_hms(2024, 6, start.0, start.1, 0, 0).unwrap(),
        end_at: Utc.with_ymd_and_hms(2024, 6, end.0, end.1, 0, 0).unwrap(),
        created_at: Utc::now(),
    }
}

fn attendance(day: &str, mode: &str) -> AttendanceRecord {
    AttendanceRecord {
        id: AttendanceId(1),
        user_uid: None,
        day: day.to_string(),
        mode: mode.to_string(),
        created_at: Utc::now(),
    }
}

fn workspace(id: i64, kind: WorkspaceType, location: Option<Location>) -> Workspace {
    let mut input = NewWorkspace::new(format!("W-{}", id), kind);
    input.location = location;
    input.into_workspace(WorkspaceId(id), Utc::now())
}

fn loc(building: &str, floor: &str, zone: Option<&str>) -> Location {
    Location {
        building: Some(building.to_string()),
        floor: Some(floor.to_string()),
        zone: zone.map(str::to_string),
    }
}

// ==================== day_range ====================

#[test]
fn test_day_range_ends_today_oldest_first() {
    let days = day_range(3, date(2024, 6, 10)).unwrap();
    assert_eq!(days, vec![date(2024, 6, 8), date(2024, 6, 9), date(2024, 6, 10)]);
}

#[test]
fn test_day_range_lengths_and_spacing() {
    let today = date(2024, 3, 1);
    for n in [1u32, 2, 7, 31, 366, 1000] {
        let days = day_range(n, today).unwrap();
        assert_eq!(days.len(), n as usize);
        assert_eq!(*days.last().unwrap(), today);
        assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }
}

#[test]
fn test_day_range_crosses_leap_day() {
    let days = day_range(3, date(2024, 3, 1)).unwrap();
    assert_eq!(days[1], date(2024, 2, 29));
}

#[test]
fn test_day_range_zero_is_empty() {
    assert!(day_range(0, date(2024, 6, 10)).unwrap().is_empty());
}

#[test]
fn test_day_range_out_of_calendar_is_error() {
    let err = day_range(u32::MAX, date(2024, 6, 10)).unwrap_err();
    assert!(matches!(err, crate::db::RepositoryError::ValidationError { .. }));
}

#[test]
fn test_booking_window_bounds() {
    let days = day_range(3, date(2024, 6, 10)).unwrap();
    let (start, end) = booking_window(&days).unwrap();
    assert_eq!(start.to_rfc3339(), "2024-06-08T00:00:00+00:00");
    assert_eq!(
        end,
        Utc.with_ymd_and_hms(2024, 6, 10, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999)
    );
    assert!(booking_window(&[]).is_none());
}

// ==================== partitioning & locations ====================

#[test]
fn test_partition_by_type() {
    let workspaces = vec![
        workspace(1, WorkspaceType::Desk, None),
        workspace(2, WorkspaceType::MeetingRoom, None),
        workspace(3, WorkspaceType::Desk, None),
    ];
    let partition = partition_workspaces(&workspaces);
    assert_eq!(partition.desk_ids, vec![WorkspaceId(1), WorkspaceId(3)]);
    assert_eq!(partition.room_ids, vec![WorkspaceId(2)]);

    let slices = space_type_distribution(&partition);
    assert_eq!(slices[0].name, "Desk");
    assert_eq!(slices[0].value, 2);
    assert_eq!(slices[1].name, "Meeting Room");
    assert_eq!(slices[1].value, 1);
}

#[test]
fn test_group_by_location_insertion_order_and_unknowns() {
    let workspaces = vec![
        workspace(1, WorkspaceType::Desk, Some(loc("HQ", "2", Some("North")))),
        workspace(2, WorkspaceType::Desk, None),
        workspace(3, WorkspaceType::MeetingRoom, Some(loc("HQ", "2", Some("North")))),
        workspace(4, WorkspaceType::Desk, Some(loc("Annex", "", None))),
        workspace(5, WorkspaceType::Desk, Some(Location::default())),
    ];

    let groups = group_by_location(&workspaces);
    let flat: Vec<(&str, &str, &str, usize)> = groups
        .iter()
        .map(|g| (g.building.as_str(), g.floor.as_str(), g.zone.as_str(), g.count))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("HQ", "2", "North", 2),
            ("Unknown", "Unknown", "Unknown", 2),
            ("Annex", "Unknown", "Unknown", 1),
        ]
    );
}

// ==================== bucketing ====================

#[test]
fn test_desk_usage_scenario() {
    let days = day_range(3, date(2024, 6, 10)).unwrap();
    let bookings = vec![booking(1, 1, (9, 9), (9, 12)), booking(2, 2, (9, 13), (9, 17))];

    let usage = bucket_desk_usage(&days, &bookings, 5);
    assert_eq!(
        usage,
        vec![
            DeskUsageDay { day: date(2024, 6, 8), booked: 0, total: 5 },
            DeskUsageDay { day: date(2024, 6, 9), booked: 2, total: 5 },
            DeskUsageDay { day: date(2024, 6, 10), booked: 0, total: 5 },
        ]
    );

    let summary = summarize(&usage, &[], &[]);
    assert_eq!(summary.avg_desk_occupancy, 13);
    assert_eq!(summary.busiest_day, "2024-06-09");
}

#[test]
fn test_multi_day_booking_counts_only_on_start_day() {
    let days = day_range(3, date(2024, 6, 10)).unwrap();
    // Starts before the window, ends inside it.
    let early = booking(1, 1, (7, 9), (9, 17));
    // Spans the whole window.
    let long = booking(2, 1, (8, 9), (10, 17));

    let usage = bucket_desk_usage(&days, &[early, long], 1);
    let booked: Vec<usize> = usage.iter().map(|d| d.booked).collect();
    assert_eq!(booked, vec![1, 0, 0]);
}

#[test]
fn test_empty_bookings_yield_zero_rows() {
    let days = day_range(4, date(2024, 6, 10)).unwrap();
    let usage = bucket_desk_usage(&days, &[], 3);
    let meetings = bucket_meeting_frequency(&days, &[]);

    assert_eq!(usage.len(), 4);
    assert!(usage.iter().all(|d| d.booked == 0 && d.total == 3));
    assert_eq!(meetings.len(), 4);
    assert!(meetings.iter().all(|m| m.meetings == 0));
    assert_eq!(summarize(&usage, &meetings, &[]).avg_desk_occupancy, 0);
}

#[test]
fn test_meeting_frequency_counts() {
    let days = day_range(2, date(2024, 6, 10)).unwrap();
    let bookings = vec![
        booking(1, 9, (10, 9), (10, 10)),
        booking(2, 9, (10, 11), (10, 12)),
        booking(3, 9, (9, 11), (9, 12)),
    ];
    assert_eq!(
        bucket_meeting_frequency(&days, &bookings),
        vec![
            MeetingFrequencyDay { day: date(2024, 6, 9), meetings: 1 },
            MeetingFrequencyDay { day: date(2024, 6, 10), meetings: 2 },
        ]
    );
}

#[test]
fn test_attendance_scenario() {
    let days = day_range(3, date(2024, 6, 10)).unwrap();
    let records = vec![
        attendance("2024-06-09", "office"),
        attendance("2024-06-09", "remote"),
        attendance("2024-06-09", "office"),
    ];

    assert_eq!(
        bucket_attendance(&days, &records),
        vec![
            AttendanceDay { day: date(2024, 6, 8), office: 0, remote: 0 },
            AttendanceDay { day: date(2024, 6, 9), office: 2, remote: 1 },
            AttendanceDay { day: date(2024, 6, 10), office: 0, remote: 0 },
        ]
    );
}

#[test]
fn test_attendance_ignores_malformed_and_out_of_range() {
    let days = day_range(2, date(2024, 6, 10)).unwrap();
    let records = vec![
        attendance("2024-06-10", "hybrid"),
        attendance("2024-06-10", "Office"),
        attendance("2024-6-10", "office"),
        attendance("not-a-date", "office"),
        attendance("2024-06-01", "office"),
        attendance("2024-06-10", "remote"),
    ];

    let rows = bucket_attendance(&days, &records);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[1].office, rows[1].remote), (0, 1));
    assert_eq!((rows[0].office, rows[0].remote), (0, 0));
}

// ==================== summary ====================

#[test]
fn test_busiest_day_tie_picks_earliest() {
    let usage = vec![
        DeskUsageDay { day: date(2024, 6, 8), booked: 1, total: 10 },
        DeskUsageDay { day: date(2024, 6, 9), booked: 4, total: 10 },
        DeskUsageDay { day: date(2024, 6, 10), booked: 4, total: 10 },
    ];
    for _ in 0..3 {
        assert_eq!(summarize(&usage, &[], &[]).busiest_day, "2024-06-09");
    }
}

#[test]
fn test_busiest_day_all_zero_is_first_day() {
    let usage = vec![
        DeskUsageDay { day: date(2024, 6, 9), booked: 0, total: 0 },
        DeskUsageDay { day: date(2024, 6, 10), booked: 0, total: 0 },
    ];
    let summary = summarize(&usage, &[], &[]);
    assert_eq!(summary.busiest_day, "2024-06-09");
    assert_eq!(summary.avg_desk_occupancy, 0);
}

#[test]
fn test_empty_window_summary() {
    let summary = summarize(&[], &[], &[]);
    assert_eq!(summary.busiest_day, "-");
    assert_eq!(summary.avg_in_office, 0);
    assert_eq!(summary.total_meetings, 0);
    assert_eq!(summary.avg_desk_occupancy, 0);
}

#[test]
fn test_avg_in_office_rounds_half_up() {
    let rows = vec![
        AttendanceDay { day: date(2024, 6, 9), office: 2, remote: 0 },
        AttendanceDay { day: date(2024, 6, 10), office: 3, remote: 4 },
    ];
    // 5 / 2 = 2.5
    assert_eq!(summarize(&[], &[], &rows).avg_in_office, 3);
}

#[test]
fn test_total_meetings_sums_series() {
    let meetings = vec![
        MeetingFrequencyDay { day: date(2024, 6, 9), meetings: 3 },
        MeetingFrequencyDay { day: date(2024, 6, 10), meetings: 4 },
    ];
    assert_eq!(summarize(&[], &meetings, &[]).total_meetings, 7);
}

// ==================== pipeline ====================

async fn seeded_repository() -> LocalRepository {
    let repo = LocalRepository::new();
    for i in 0..5 {
        repo.create_workspace(
            NewWorkspace::new(format!("D-{}", i), WorkspaceType::Desk)
                .with_location(loc("HQ", "1", Some("A"))),
        )
        .await
        .unwrap();
    }
    let room = repo
        .create_workspace(NewWorkspace::new("Orion", WorkspaceType::MeetingRoom).with_capacity(8))
        .await
        .unwrap();

    let desk = WorkspaceId(1);
    for hour in [9, 13] {
        repo.create_booking(NewBooking::confirmed(
            desk,
            Utc.with_ymd_and_hms(2024, 6, 9, hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 9, hour + 2, 0, 0).unwrap(),
        ))
        .await
        .unwrap();
    }
    repo.create_booking(
        NewBooking::confirmed(
            desk,
            Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap(),
        )
        .with_status(BookingStatus::Cancelled),
    )
    .await
    .unwrap();
    repo.create_booking(NewBooking::confirmed(
        room.id,
        Utc.with_ymd_and_hms(2024, 6, 10, 14, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap(),
    ))
    .await
    .unwrap();

    repo.insert_raw_attendance("2024-06-09", "office");
    repo.insert_raw_attendance("2024-06-09", "remote");
    repo.insert_raw_attendance("2024-06-09", "office");
    repo
}

#[tokio::test]
async fn test_default_status_filter_counts_no_workspaces() {
    let repo = seeded_repository().await;
    let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &AnalyticsOptions::default())
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.analytics.space_type_distribution[0].value, 0);
    assert_eq!(response.analytics.space_type_distribution[1].value, 0);
    assert!(response.analytics.office_location.is_empty());
    assert!(response.analytics.desk_usage_by_day.iter().all(|d| d.booked == 0));
    assert_eq!(response.summary.avg_desk_occupancy, 0);
    // Attendance does not depend on the workspace filter.
    assert_eq!(response.analytics.attendance_by_day[1].office, 2);
    assert_eq!(response.summary.avg_in_office, 1);
}

#[tokio::test]
async fn test_pipeline_with_available_filter() {
    let repo = seeded_repository().await;
    let options = AnalyticsOptions::default().with_workspace_status("available");
    let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &options)
        .await
        .unwrap();

    let booked: Vec<usize> = response
        .analytics
        .desk_usage_by_day
        .iter()
        .map(|d| d.booked)
        .collect();
    assert_eq!(booked, vec![0, 2, 0]);
    assert!(response.analytics.desk_usage_by_day.iter().all(|d| d.total == 5));
    assert_eq!(response.summary.avg_desk_occupancy, 13);
    assert_eq!(response.summary.total_meetings, 1);
    assert_eq!(response.summary.busiest_day, "2024-06-09");
    assert_eq!(response.analytics.office_location.len(), 2);
    assert_eq!(response.analytics.office_location[0].count, 5);
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let repo = seeded_repository().await;
    let options = AnalyticsOptions::default().with_workspace_status("available");
    let first = get_latest_analytics(&repo, 7, date(2024, 6, 10), &options)
        .await
        .unwrap();
    let second = get_latest_analytics(&repo, 7, date(2024, 6, 10), &options)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_pipeline_empty_window() {
    let repo = seeded_repository().await;
    let response = get_latest_analytics(&repo, 0, date(2024, 6, 10), &AnalyticsOptions::default())
        .await
        .unwrap();
    assert!(response.analytics.desk_usage_by_day.is_empty());
    assert!(response.analytics.attendance_by_day.is_empty());
    assert_eq!(response.summary.busiest_day, "-");
}

#[tokio::test]
async fn test_pipeline_fails_when_storage_is_down() {
    let repo = seeded_repository().await;
    repo.set_healthy(false);
    let result =
        get_latest_analytics(&repo, 3, date(2024, 6, 10), &AnalyticsOptions::default()).await;
    assert!(result.is_err());
}
