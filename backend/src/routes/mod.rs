//! Wire types and paths for each HTTP resource.

pub mod analytics;
pub mod attendance;
pub mod health;
pub mod tasks;
pub mod users;
pub mod workspaces;

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        assert_eq!(super::analytics::GET_ANALYTICS, "/dashboard/analytics");
        assert_eq!(super::workspaces::POST_WORKSPACE, "/dashboard/workspace");
        assert_eq!(super::workspaces::LIST_WORKSPACES, "/dashboard/workspaces");
        assert_eq!(super::workspaces::BOOKINGS, "/dashboard/bookings");
        assert_eq!(super::attendance::ATTENDANCE, "/api/attendance");
        assert_eq!(super::users::USERS, "/users");
        assert_eq!(super::users::USER_ROLE_BY_EMAIL, "/users/role/{email}");
        assert_eq!(super::users::USER_BY_KEY, "/users/{key}");
        assert_eq!(super::tasks::TASKS, "/nestboard/tasks");
        assert_eq!(super::tasks::TASK_BY_ID, "/nestboard/tasks/{id}");
        assert_eq!(super::health::HEALTH, "/health");
    }
}
