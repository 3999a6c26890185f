//! End-to-end analytics runs against the in-memory repository.

mod support;

use support::{add_desks, add_room, at, book, date};
use worknest::db::repositories::LocalRepository;
use worknest::db::repository::{AttendanceRepository, BookingRepository};
use worknest::models::{AttendanceMode, BookingStatus, NewAttendance, NewBooking, WorkspaceStatus};
use worknest::services::analytics::{get_latest_analytics, AnalyticsOptions};

fn available() -> AnalyticsOptions {
    AnalyticsOptions::default().with_workspace_status("available")
}

#[tokio::test]
async fn test_three_day_window_desk_usage() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 5, WorkspaceStatus::Available).await;
    let day = date(2024, 6, 9);
    book(&repo, desks[0].id, at(day, 9), at(day, 12)).await;
    book(&repo, desks[1].id, at(day, 13), at(day, 17)).await;

    let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &available())
        .await
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json["analytics"]["deskUsageByDay"],
        serde_json::json!([
            {"day": "2024-06-08", "booked": 0, "total": 5},
            {"day": "2024-06-09", "booked": 2, "total": 5},
            {"day": "2024-06-10", "booked": 0, "total": 5},
        ])
    );
    assert_eq!(json["summary"]["avgDeskOccupancy"], 13);
    assert_eq!(json["summary"]["busiestDay"], "2024-06-09");
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_attendance_counts_per_day() {
    let repo = LocalRepository::new();
    for mode in [AttendanceMode::Office, AttendanceMode::Remote, AttendanceMode::Office] {
        repo.record_attendance(NewAttendance::new(date(2024, 6, 9), mode))
            .await
            .unwrap();
    }

    let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &available())
        .await
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json["analytics"]["attendanceByDay"],
        serde_json::json!([
            {"day": "2024-06-08", "office": 0, "remote": 0},
            {"day": "2024-06-09", "office": 2, "remote": 1},
            {"day": "2024-06-10", "office": 0, "remote": 0},
        ])
    );
}

#[tokio::test]
async fn test_booking_overlapping_window_start_is_not_bucketed() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 1, WorkspaceStatus::Available).await;
    book(
        &repo,
        desks[0].id,
        at(date(2024, 6, 7), 18),
        at(date(2024, 6, 8), 10),
    )
    .await;

    let (start, end) = (at(date(2024, 6, 8), 0), at(date(2024, 6, 10), 23));
    let loaded = repo
        .find_confirmed_bookings(&[desks[0].id], start, end)
        .await
        .unwrap();
    assert_eq!(loaded.len(), 1);

    let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &available())
        .await
        .unwrap();
    assert!(response
        .analytics
        .desk_usage_by_day
        .iter()
        .all(|d| d.booked == 0));
}

#[tokio::test]
async fn test_empty_store_has_zero_distribution() {
    let repo = LocalRepository::new();
    let response = get_latest_analytics(&repo, 7, date(2024, 6, 10), &available())
        .await
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json["analytics"]["spaceTypeDistribution"],
        serde_json::json!([
            {"name": "Desk", "value": 0},
            {"name": "Meeting Room", "value": 0},
        ])
    );
    assert_eq!(json["summary"]["avgDeskOccupancy"], 0);
    assert_eq!(json["analytics"]["deskUsageByDay"].as_array().unwrap().len(), 7);
    assert_eq!(json["analytics"]["officeLocation"], serde_json::json!([]));
}

#[tokio::test]
async fn test_meetings_and_cancelled_bookings() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 2, WorkspaceStatus::Available).await;
    let room = add_room(&repo, "Orion", 8).await;
    let day = date(2024, 6, 10);

    book(&repo, room.id, at(day, 10), at(day, 11)).await;
    book(&repo, room.id, at(day, 14), at(day, 15)).await;
    repo.create_booking(
        NewBooking::confirmed(desks[0].id, at(day, 9), at(day, 17))
            .with_status(BookingStatus::Cancelled),
    )
    .await
    .unwrap();

    let response = get_latest_analytics(&repo, 2, day, &available())
        .await
        .unwrap();

    assert_eq!(response.summary.total_meetings, 2);
    assert_eq!(response.analytics.meeting_frequency_by_day[1].meetings, 2);
    assert!(response
        .analytics
        .desk_usage_by_day
        .iter()
        .all(|d| d.booked == 0));
    assert_eq!(response.analytics.office_location.len(), 2);
    assert_eq!(response.analytics.office_location[0].building, "HQ");
    assert_eq!(response.analytics.office_location[0].floor, "1");
    assert_eq!(response.analytics.office_location[1].zone, "West");
}

#[tokio::test]
async fn test_default_filter_ignores_available_workspaces() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 3, WorkspaceStatus::Available).await;
    let day = date(2024, 6, 10);
    book(&repo, desks[0].id, at(day, 9), at(day, 10)).await;

    let response = get_latest_analytics(&repo, 1, day, &AnalyticsOptions::default())
        .await
        .unwrap();

    assert_eq!(response.analytics.space_type_distribution[0].value, 0);
    assert_eq!(response.analytics.desk_usage_by_day[0].booked, 0);
    assert_eq!(response.analytics.desk_usage_by_day[0].total, 0);
    assert_eq!(response.summary.avg_desk_occupancy, 0);
}

#[tokio::test]
async fn test_busiest_day_tie_is_stable() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 4, WorkspaceStatus::Available).await;
    for day in [date(2024, 6, 8), date(2024, 6, 10)] {
        for desk in &desks {
            book(&repo, desk.id, at(day, 9), at(day, 10)).await;
        }
    }

    for _ in 0..3 {
        let response = get_latest_analytics(&repo, 3, date(2024, 6, 10), &available())
            .await
            .unwrap();
        assert_eq!(response.summary.busiest_day, "2024-06-08");
    }
}

#[tokio::test]
async fn test_repeated_runs_are_byte_identical() {
    let repo = LocalRepository::new();
    let desks = add_desks(&repo, 2, WorkspaceStatus::Available).await;
    let day = date(2024, 6, 9);
    book(&repo, desks[1].id, at(day, 8), at(day, 9)).await;

    let first = get_latest_analytics(&repo, 5, date(2024, 6, 10), &available())
        .await
        .unwrap();
    let second = get_latest_analytics(&repo, 5, date(2024, 6, 10), &available())
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn test_unavailable_storage_fails_whole_request() {
    let repo = LocalRepository::new();
    add_desks(&repo, 1, WorkspaceStatus::Available).await;
    repo.set_healthy(false);

    let result = get_latest_analytics(&repo, 3, date(2024, 6, 10), &available()).await;
    assert!(result.is_err());
}
