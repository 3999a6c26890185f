//! User repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewUser, User, UserId, UserUpdate};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    /// Look a user up by identity-provider uid.
    async fn find_user_by_uid(&self, uid: &str) -> RepositoryResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;

    /// Apply `update` and return the updated user, or `None` if absent.
    async fn update_user(&self, id: UserId, update: UserUpdate) -> RepositoryResult<Option<User>>;

    /// Remove a user and return what was removed, or `None` if absent.
    async fn delete_user(&self, id: UserId) -> RepositoryResult<Option<User>>;
}
