use serde::{Deserialize, Serialize};

use crate::models::Task;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
}

pub const TASKS: &str = "/nestboard/tasks";
pub const TASK_BY_ID: &str = "/nestboard/tasks/{id}";

/// Header carrying the caller's identity-provider uid.
pub const USER_UID_HEADER: &str = "x-user-uid";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted.";

pub const TASK_USER_NOT_FOUND_MESSAGE: &str = "User not found.";
pub const TASK_UNAUTHORIZED_MESSAGE: &str = "Unauthorized.";
pub const TASK_TITLE_REQUIRED_MESSAGE: &str = "Task title is required.";
pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found.";
