use serde::{Deserialize, Serialize};

use crate::models::AttendanceRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub success: bool,
    pub attendance: AttendanceRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceListResponse {
    pub success: bool,
    pub attendance: Vec<AttendanceRecord>,
}

pub const ATTENDANCE: &str = "/api/attendance";
