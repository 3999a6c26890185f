//! Personal task board entries.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

crate::define_id_type!(i64, TaskId);

/// Tag assigned when a task is created without one.
pub const DEFAULT_TASK_TAG: &str = "Design";

/// Board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!("Unknown task status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub tag: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Board ordering: status name, then `order` ascending, then newest first.
    pub fn board_cmp(&self, other: &Task) -> Ordering {
        self.status
            .as_str()
            .cmp(other.status.as_str())
            .then(self.order.cmp(&other.order))
            .then(other.created_at.cmp(&self.created_at))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub tag: String,
    pub due_date: Option<DateTime<Utc>>,
    pub order: i64,
}

impl NewTask {
    pub fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Task {
        Task {
            id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: self.status,
            tag: self.tag,
            due_date: self.due_date,
            order: self.order,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial task update. `due_date: Some(None)` clears the date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = Some(description.trim().to_string());
        }
        if let Some(tag) = self.tag {
            task.tag = tag.trim().to_string();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(order) = self.order {
            task.order = order;
        }
        task.updated_at = now;
    }
}
