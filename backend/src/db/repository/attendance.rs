//! Attendance repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{AttendanceRecord, NewAttendance};

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Store one check-in. Duplicate records for the same user and day are
    /// accepted as-is.
    async fn record_attendance(&self, attendance: NewAttendance)
        -> RepositoryResult<AttendanceRecord>;

    /// Find records whose stored `day` string is one of `days`.
    ///
    /// Exact string membership, not a date range: records with a malformed
    /// day never match.
    async fn find_attendance_by_days(&self, days: &[String])
        -> RepositoryResult<Vec<AttendanceRecord>>;
}
