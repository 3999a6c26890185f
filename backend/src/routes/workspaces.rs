use serde::{Deserialize, Serialize};

use crate::models::{Booking, Workspace};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceCreatedResponse {
    pub workspace: Workspace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceListResponse {
    pub success: bool,
    pub workspaces: Vec<Workspace>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
}

pub const POST_WORKSPACE: &str = "/dashboard/workspace";
pub const LIST_WORKSPACES: &str = "/dashboard/workspaces";
pub const BOOKINGS: &str = "/dashboard/bookings";
