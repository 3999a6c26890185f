//! Personal task board rules.
//!
//! Every operation is scoped to the user resolved from the caller's
//! identity-provider uid. Tasks belonging to someone else behave as if they
//! did not exist.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use log::info;

use crate::db::repository::{FullRepository, RepositoryError};
use crate::models::{NewTask, Task, TaskId, TaskPatch, TaskStatus, User, DEFAULT_TASK_TAG};

#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    #[error("no user matches the supplied uid")]
    UnknownUser,

    #[error("task title is required")]
    MissingTitle,

    #[error("task not found")]
    TaskNotFound,

    #[error("invalid due date: {0}")]
    InvalidDueDate(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Input for a new card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Parse a due date given as RFC 3339 or `YYYY-MM-DD` (midnight UTC).
///
/// A blank value means "no due date".
pub fn parse_due_date(raw: &str) -> TaskServiceResult<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|day| Some(day.and_time(NaiveTime::MIN).and_utc()))
        .map_err(|_| TaskServiceError::InvalidDueDate(raw.to_string()))
}

/// Look up the board owner. A missing or blank uid is an unknown user.
pub async fn resolve_user<R: FullRepository + ?Sized>(
    repo: &R,
    uid: Option<&str>,
) -> TaskServiceResult<User> {
    let uid = uid
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .ok_or(TaskServiceError::UnknownUser)?;
    repo.find_user_by_uid(uid)
        .await?
        .ok_or(TaskServiceError::UnknownUser)
}

/// The owner's tasks: by status name, then `order`, then newest first.
pub async fn list_tasks<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &User,
) -> TaskServiceResult<Vec<Task>> {
    Ok(repo.list_tasks_for_user(owner.id).await?)
}

/// Append a card to the bottom of its column.
pub async fn create_task<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &User,
    draft: TaskDraft,
) -> TaskServiceResult<Task> {
    let title = draft
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TaskServiceError::MissingTitle)?
        .to_string();

    let status = draft.status.unwrap_or_default();
    let order = repo
        .max_task_order(owner.id, status)
        .await?
        .map_or(1, |max| max + 1);

    let tag = draft
        .tag
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| DEFAULT_TASK_TAG.to_string());

    let task = repo
        .create_task(NewTask {
            user_id: owner.id,
            title,
            description: draft.description.map(|d| d.trim().to_string()),
            status,
            tag,
            due_date: draft.due_date,
            order,
        })
        .await?;

    info!(
        "Created task {} in '{}' for user {} (order {})",
        task.id,
        task.status.as_str(),
        owner.uid,
        task.order
    );
    Ok(task)
}

pub async fn update_task<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &User,
    id: TaskId,
    patch: TaskPatch,
) -> TaskServiceResult<Task> {
    let mut task = repo
        .find_task_for_user(id, owner.id)
        .await?
        .ok_or(TaskServiceError::TaskNotFound)?;

    patch.apply(&mut task, Utc::now());
    Ok(repo.save_task(&task).await?)
}

pub async fn delete_task<R: FullRepository + ?Sized>(
    repo: &R,
    owner: &User,
    id: TaskId,
) -> TaskServiceResult<Task> {
    let deleted = repo
        .delete_task_for_user(id, owner.id)
        .await?
        .ok_or(TaskServiceError::TaskNotFound)?;
    info!("Deleted task {} for user {}", deleted.id, owner.uid);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::UserRepository;
    use crate::models::NewUser;

    async fn owner(repo: &LocalRepository, uid: &str) -> User {
        repo.create_user(NewUser {
            uid: uid.to_string(),
            name: "Owner".to_string(),
            email: format!("{}@example.com", uid),
            role: "employee".to_string(),
            company_name: "Acme".to_string(),
        })
        .await
        .unwrap()
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_due_date_formats() {
        let rfc = parse_due_date("2024-06-10T09:30:00+02:00").unwrap().unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-06-10T07:30:00+00:00");

        let day = parse_due_date("2024-06-10").unwrap().unwrap();
        assert_eq!(day.to_rfc3339(), "2024-06-10T00:00:00+00:00");

        assert_eq!(parse_due_date("  ").unwrap(), None);
        assert!(matches!(
            parse_due_date("next friday"),
            Err(TaskServiceError::InvalidDueDate(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_user_rejects_blank_and_unknown() {
        let repo = LocalRepository::new();
        owner(&repo, "uid-1").await;

        assert!(matches!(
            resolve_user(&repo, None).await,
            Err(TaskServiceError::UnknownUser)
        ));
        assert!(matches!(
            resolve_user(&repo, Some("  ")).await,
            Err(TaskServiceError::UnknownUser)
        ));
        assert!(matches!(
            resolve_user(&repo, Some("uid-2")).await,
            Err(TaskServiceError::UnknownUser)
        ));
        assert_eq!(resolve_user(&repo, Some("uid-1")).await.unwrap().uid, "uid-1");
    }

    #[tokio::test]
    async fn test_create_appends_to_column() {
        let repo = LocalRepository::new();
        let user = owner(&repo, "uid-1").await;

        let first = create_task(&repo, &user, draft("  First ")).await.unwrap();
        let second = create_task(&repo, &user, draft("Second")).await.unwrap();
        let done = create_task(
            &repo,
            &user,
            TaskDraft {
                status: Some(TaskStatus::Done),
                ..draft("Finished")
            },
        )
        .await
        .unwrap();

        assert_eq!(first.title, "First");
        assert_eq!(first.tag, DEFAULT_TASK_TAG);
        assert_eq!((first.order, second.order, done.order), (1, 2, 1));
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let repo = LocalRepository::new();
        let user = owner(&repo, "uid-1").await;

        let err = create_task(&repo, &user, draft("   ")).await.unwrap_err();
        assert!(matches!(err, TaskServiceError::MissingTitle));
        let err = create_task(&repo, &user, TaskDraft::default()).await.unwrap_err();
        assert!(matches!(err, TaskServiceError::MissingTitle));
    }

    #[tokio::test]
    async fn test_other_users_tasks_are_invisible() {
        let repo = LocalRepository::new();
        let alice = owner(&repo, "alice").await;
        let bob = owner(&repo, "bob").await;
        let task = create_task(&repo, &alice, draft("Private")).await.unwrap();

        let err = update_task(&repo, &bob, task.id, TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TaskServiceError::TaskNotFound));
        let err = delete_task(&repo, &bob, task.id).await.unwrap_err();
        assert!(matches!(err, TaskServiceError::TaskNotFound));

        assert!(list_tasks(&repo, &bob).await.unwrap().is_empty());
        assert_eq!(list_tasks(&repo, &alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_moves_between_columns() {
        let repo = LocalRepository::new();
        let user = owner(&repo, "uid-1").await;
        let task = create_task(&repo, &user, draft("Move me")).await.unwrap();

        let moved = update_task(
            &repo,
            &user,
            task.id,
            TaskPatch {
                status: Some(TaskStatus::InProgress),
                order: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(moved.status, TaskStatus::InProgress);
        assert_eq!(moved.order, 5);
        assert!(moved.updated_at >= task.updated_at);
    }
}
