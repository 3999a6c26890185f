//! Application users. Identity itself lives with the external identity
//! provider; `uid` is the provider's subject identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id_type!(i64, UserId);

const MAX_UID_LEN: usize = 50;
const MAX_NAME_LEN: usize = 50;
const MAX_EMAIL_LEN: usize = 50;
const MAX_ROLE_LEN: usize = 30;
const MAX_COMPANY_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub uid: String,
    pub name: String,
    pub company_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub company_name: String,
}

fn check_field(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters", field, max_len));
    }
    Ok(())
}

impl NewUser {
    pub fn validate(&self) -> Result<(), String> {
        check_field("uid", &self.uid, MAX_UID_LEN)?;
        check_field("name", &self.name, MAX_NAME_LEN)?;
        check_field("email", &self.email, MAX_EMAIL_LEN)?;
        check_field("role", &self.role, MAX_ROLE_LEN)?;
        check_field("companyName", &self.company_name, MAX_COMPANY_LEN)?;
        Ok(())
    }

    pub fn into_user(self, id: UserId, created_at: DateTime<Utc>) -> User {
        User {
            id,
            uid: self.uid,
            name: self.name,
            company_name: self.company_name,
            email: self.email,
            role: self.role,
            created_at,
        }
    }
}

/// Profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            check_field("name", name, MAX_NAME_LEN)?;
        }
        if let Some(email) = &self.email {
            check_field("email", email, MAX_EMAIL_LEN)?;
        }
        if let Some(role) = &self.role {
            check_field("role", role, MAX_ROLE_LEN)?;
        }
        if let Some(company) = &self.company_name {
            check_field("companyName", company, MAX_COMPANY_LEN)?;
        }
        Ok(())
    }

    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(company) = self.company_name {
            user.company_name = company;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user() -> NewUser {
        NewUser {
            uid: "firebase-uid-1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "employee".to_string(),
            company_name: "Acme".to_string(),
        }
    }

    #[test]
    fn test_valid_user() {
        assert!(new_user().validate().is_ok());
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut user = new_user();
        user.role = "  ".to_string();
        assert_eq!(user.validate().unwrap_err(), "role is required");
    }

    #[test]
    fn test_company_name_length_limit() {
        let mut user = new_user();
        user.company_name = "x".repeat(31);
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut user = new_user().into_user(UserId(1), Utc::now());
        UserUpdate {
            role: Some("admin".to_string()),
            ..Default::default()
        }
        .apply(&mut user);
        assert_eq!(user.role, "admin");
        assert_eq!(user.name, "Ada");
    }
}
