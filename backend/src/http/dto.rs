//! Request bodies and query strings for the REST API.
//!
//! Response envelopes live in [`crate::routes`] and are re-exported from
//! [`crate::api`]; this module only holds what the server parses.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{TaskPatch, TaskStatus, DAY_FORMAT};
use crate::services::analytics::DEFAULT_WINDOW_DAYS;
use crate::services::tasks::{parse_due_date, TaskDraft, TaskServiceResult};

/// `?days=` on the analytics endpoint, kept raw so bad input falls back
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub days: Option<String>,
}

impl AnalyticsQuery {
    /// Number of days in the analytics window.
    ///
    /// Fractions are floored. Anything that does not leave at least one whole
    /// day gives [`DEFAULT_WINDOW_DAYS`].
    pub fn window_days(&self) -> u32 {
        self.days
            .as_deref()
            .map(str::trim)
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 1.0)
            // saturating cast; oversized windows fail in day_range
            .map(|value| value.floor() as u32)
            .unwrap_or(DEFAULT_WINDOW_DAYS)
    }
}

/// `?day=YYYY-MM-DD` on the attendance listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    #[serde(default)]
    pub day: Option<String>,
}

impl AttendanceQuery {
    pub fn parsed_day(&self) -> Result<NaiveDate, String> {
        let raw = self
            .day
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "Query parameter 'day' is required".to_string())?;
        NaiveDate::parse_from_str(raw, DAY_FORMAT)
            .map_err(|_| format!("Invalid day '{}', expected YYYY-MM-DD", raw))
    }
}

/// Body of `POST /nestboard/tasks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_draft(self) -> TaskServiceResult<TaskDraft> {
        let due_date = match self.due_date.as_deref() {
            Some(raw) => parse_due_date(raw)?,
            None => None,
        };
        Ok(TaskDraft {
            title: self.title,
            description: self.description,
            tag: self.tag,
            status: self.status,
            due_date,
        })
    }
}

/// Body of `PATCH /nestboard/tasks/{id}`.
///
/// `dueDate` distinguishes absent (keep) from `null` (clear).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub order: Option<i64>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskUpdateRequest {
    pub fn into_patch(self) -> TaskServiceResult<TaskPatch> {
        let due_date = match self.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(parse_due_date(&raw)?),
        };
        Ok(TaskPatch {
            title: self.title,
            description: self.description,
            tag: self.tag,
            status: self.status,
            due_date,
            order: self.order,
        })
    }
}
