//! Workspace reservations.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::WorkspaceId;

crate::define_id_type!(i64, BookingId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown booking status: {}", other)),
        }
    }
}

/// A stored booking covering `[start_at, end_at]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: BookingId,
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub user_uid: Option<String>,
    pub status: BookingStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// True when the booking interval intersects `[window_start, window_end]`.
    pub fn overlaps(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> bool {
        self.start_at <= window_end && self.end_at >= window_start
    }

    /// Calendar day (UTC) the booking starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start_at.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub workspace_id: WorkspaceId,
    #[serde(default)]
    pub user_uid: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn confirmed(
        workspace_id: WorkspaceId,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Self {
        Self {
            workspace_id,
            user_uid: None,
            status: BookingStatus::Confirmed,
            start_at,
            end_at,
        }
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end_at < self.start_at {
            return Err("Booking end must not precede its start".to_string());
        }
        Ok(())
    }

    pub fn into_booking(self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            workspace_id: self.workspace_id,
            user_uid: self.user_uid,
            status: self.status,
            start_at: self.start_at,
            end_at: self.end_at,
            created_at,
        }
    }
}
