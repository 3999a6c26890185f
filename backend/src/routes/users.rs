use serde::{Deserialize, Serialize};

use crate::models::User;

/// `GET /users`. An empty store adds a `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub users: Vec<User>,
}

/// Single-user envelope. The key is `users` for compatibility with the
/// existing client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub users: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRoleResponse {
    pub success: bool,
    pub role: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDeletedResponse {
    pub message: String,
    pub users: User,
}

pub const USERS: &str = "/users";
pub const USER_ROLE_BY_EMAIL: &str = "/users/role/{email}";
/// `GET` looks up by provider uid; `PUT`/`DELETE` address the stored id.
pub const USER_BY_KEY: &str = "/users/{key}";

pub const NO_USERS_MESSAGE: &str = "There is no user.";
pub const USER_DELETED_MESSAGE: &str = "User deleted successfully!!";
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";
pub const USER_NOT_DELETED_MESSAGE: &str = "User not found, cannot be deleted!!";
