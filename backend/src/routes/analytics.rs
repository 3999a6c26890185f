use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =========================================================
// Dashboard analytics types
// =========================================================

/// Desk bookings on one day against the desk count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskUsageDay {
    pub day: NaiveDate,
    pub booked: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingFrequencyDay {
    pub day: NaiveDate,
    pub meetings: usize,
}

/// Office / remote check-ins on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub day: NaiveDate,
    pub office: usize,
    pub remote: usize,
}

/// One slice of the workspace-type pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceTypeSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeLocationCount {
    pub building: String,
    pub floor: String,
    pub zone: String,
    pub count: usize,
}

/// Chart series. Every per-day series has one entry per day of the window,
/// oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub desk_usage_by_day: Vec<DeskUsageDay>,
    pub meeting_frequency_by_day: Vec<MeetingFrequencyDay>,
    pub attendance_by_day: Vec<AttendanceDay>,
    pub space_type_distribution: Vec<SpaceTypeSlice>,
    pub office_location: Vec<OfficeLocationCount>,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Percentage, 0 when there is no desk capacity.
    pub avg_desk_occupancy: u64,
    pub total_meetings: usize,
    pub avg_in_office: u64,
    /// `YYYY-MM-DD`, or `"-"` for an empty window.
    pub busiest_day: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: AnalyticsData,
    pub summary: AnalyticsSummary,
}

pub const GET_ANALYTICS: &str = "/dashboard/analytics";
pub const ANALYTICS_FAILED_MESSAGE: &str = "Failed to fetch analytics";

/// Placeholder for `busiest_day` when there are no days.
pub const NO_BUSIEST_DAY: &str = "-";
pub const DESK_SLICE: &str = "Desk";
pub const MEETING_ROOM_SLICE: &str = "Meeting Room";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_uses_camel_case_keys() {
        let response = AnalyticsResponse {
            success: true,
            analytics: AnalyticsData {
                desk_usage_by_day: vec![DeskUsageDay {
                    day: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
                    booked: 2,
                    total: 5,
                }],
                meeting_frequency_by_day: vec![],
                attendance_by_day: vec![],
                space_type_distribution: vec![],
                office_location: vec![],
            },
            summary: AnalyticsSummary {
                avg_desk_occupancy: 40,
                total_meetings: 0,
                avg_in_office: 0,
                busiest_day: "2024-06-09".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["analytics"]["deskUsageByDay"][0]["day"], "2024-06-09");
        assert!(json["analytics"]["spaceTypeDistribution"].is_array());
        assert_eq!(json["summary"]["avgDeskOccupancy"], 40);
        assert_eq!(json["summary"]["busiestDay"], "2024-06-09");
    }
}
