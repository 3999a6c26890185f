//! Bookable workspaces: desks and meeting rooms.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id_type!(i64, WorkspaceId);

/// Placeholder used wherever a location component is missing.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Workspace category. Immutable once created; analytics partitions on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkspaceType {
    #[serde(rename = "desk")]
    Desk,
    #[serde(rename = "meeting-room")]
    MeetingRoom,
}

impl WorkspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desk => "desk",
            Self::MeetingRoom => "meeting-room",
        }
    }
}

impl FromStr for WorkspaceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "desk" => Ok(Self::Desk),
            "meeting-room" => Ok(Self::MeetingRoom),
            other => Err(format!("Unknown workspace type: {}", other)),
        }
    }
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

impl WorkspaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl FromStr for WorkspaceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(format!("Unknown workspace status: {}", other)),
        }
    }
}

/// Physical placement of a workspace. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl Location {
    /// `(building, floor, zone)` with absent or empty parts replaced by
    /// [`UNKNOWN_LOCATION`].
    pub fn key(location: Option<&Location>) -> (String, String, String) {
        fn part(value: Option<&String>) -> String {
            match value {
                Some(v) if !v.is_empty() => v.clone(),
                _ => UNKNOWN_LOCATION.to_string(),
            }
        }

        match location {
            Some(loc) => (
                part(loc.building.as_ref()),
                part(loc.floor.as_ref()),
                part(loc.zone.as_ref()),
            ),
            None => (
                UNKNOWN_LOCATION.to_string(),
                UNKNOWN_LOCATION.to_string(),
                UNKNOWN_LOCATION.to_string(),
            ),
        }
    }
}

/// A stored workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(rename = "_id")]
    pub id: WorkspaceId,
    pub name: String,
    #[serde(rename = "type")]
    pub workspace_type: WorkspaceType,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkspace {
    pub name: String,
    #[serde(rename = "type")]
    pub workspace_type: WorkspaceType,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub status: WorkspaceStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl NewWorkspace {
    pub fn new(name: impl Into<String>, workspace_type: WorkspaceType) -> Self {
        Self {
            name: name.into(),
            workspace_type,
            location: None,
            capacity: None,
            amenities: Vec::new(),
            status: WorkspaceStatus::default(),
            description: None,
            is_active: true,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_status(mut self, status: WorkspaceStatus) -> Self {
        self.status = status;
        self
    }

    /// Check required fields. Meeting rooms must declare a capacity.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Workspace name is required".to_string());
        }
        if self.workspace_type == WorkspaceType::MeetingRoom && self.capacity.is_none() {
            return Err("Capacity is required for meeting rooms".to_string());
        }
        Ok(())
    }

    /// Materialize the stored record.
    pub fn into_workspace(self, id: WorkspaceId, created_at: DateTime<Utc>) -> Workspace {
        Workspace {
            id,
            name: self.name.trim().to_string(),
            workspace_type: self.workspace_type,
            location: self.location,
            capacity: self.capacity,
            amenities: self.amenities,
            status: self.status,
            description: self.description,
            is_active: self.is_active,
            created_at,
        }
    }
}
