use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// `connected`, `disconnected` or `error: <detail>`.
    pub database: String,
}

/// Generic `{success, message}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

pub const HEALTH: &str = "/health";
pub const SERVER_RUNNING_MESSAGE: &str = "Server is running";
