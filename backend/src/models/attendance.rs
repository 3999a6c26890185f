//! Daily attendance check-ins.
//!
//! Stored records keep `day` and `mode` as the raw strings that were written,
//! so readers tolerate malformed legacy data instead of failing on it.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

crate::define_id_type!(i64, AttendanceId);

/// Format of the `day` field.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceMode {
    Office,
    Remote,
}

impl AttendanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Remote => "remote",
        }
    }
}

impl FromStr for AttendanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "office" => Ok(Self::Office),
            "remote" => Ok(Self::Remote),
            other => Err(format!("Unknown attendance mode: {}", other)),
        }
    }
}

/// Render a date as a `day` key.
pub fn day_key(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// A stored attendance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: AttendanceId,
    #[serde(default)]
    pub user_uid: Option<String>,
    pub day: String,
    pub mode: String,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// `None` for anything other than `office` or `remote`.
    pub fn parsed_mode(&self) -> Option<AttendanceMode> {
        self.mode.parse().ok()
    }

    /// `None` unless `day` is a canonical zero-padded `YYYY-MM-DD` key.
    pub fn parsed_day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.day, DAY_FORMAT)
            .ok()
            .filter(|d| day_key(*d) == self.day)
    }
}

/// Input for recording attendance. Always well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    #[serde(default)]
    pub user_uid: Option<String>,
    pub day: NaiveDate,
    pub mode: AttendanceMode,
}

impl NewAttendance {
    pub fn new(day: NaiveDate, mode: AttendanceMode) -> Self {
        Self {
            user_uid: None,
            day,
            mode,
        }
    }

    pub fn for_user(mut self, uid: impl Into<String>) -> Self {
        self.user_uid = Some(uid.into());
        self
    }

    pub fn into_record(self, id: AttendanceId, created_at: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id,
            user_uid: self.user_uid,
            day: day_key(self.day),
            mode: self.mode.as_str().to_string(),
            created_at,
        }
    }
}
