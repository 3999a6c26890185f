//! Task board repository trait.
//!
//! Every lookup is scoped by owner: a task id belonging to someone else
//! behaves exactly like a missing one.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewTask, Task, TaskId, TaskStatus, UserId};

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// All tasks of `user_id`, ordered by status name, then `order`
    /// ascending, then newest first.
    async fn list_tasks_for_user(&self, user_id: UserId) -> RepositoryResult<Vec<Task>>;

    /// Highest `order` in the user's `status` column, if the column has tasks.
    async fn max_task_order(
        &self,
        user_id: UserId,
        status: TaskStatus,
    ) -> RepositoryResult<Option<i64>>;

    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task>;

    async fn find_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>>;

    /// Overwrite a stored task with `task`.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if the task no longer exists
    async fn save_task(&self, task: &Task) -> RepositoryResult<Task>;

    async fn delete_task_for_user(
        &self,
        id: TaskId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Task>>;
}
