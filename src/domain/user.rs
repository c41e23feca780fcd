// User domain model and request/response envelopes

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    /// Accepted for API compatibility; never stored (the directory is a mock)
    #[serde(default)]
    pub password: Option<String>,
}

impl CreateUser {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email)?;

        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AppError::Validation("Name fields must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Payload for partially updating a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }

        Ok(())
    }
}

fn validate_email(email: &str) -> Result<()> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Support footer attached to every user response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Support {
    pub url: String,
    pub text: String,
}

/// Response for single-user endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub data: User,
    pub support: Support,
}

/// Response for the paginated list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub data: Vec<User>,
    pub support: Support,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateUser {
        CreateUser {
            email: "morpheus@reqres.in".to_string(),
            first_name: "Morpheus".to_string(),
            last_name: "Leader".to_string(),
            avatar: "https://reqres.in/img/faces/1-image.jpg".to_string(),
            password: Some("zion".to_string()),
        }
    }

    #[test]
    fn test_create_user_valid() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_create_user_bad_email() {
        let mut payload = valid_create();
        payload.email = "not-an-email".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_user_empty_name() {
        let mut payload = valid_create();
        payload.first_name = "  ".to_string();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_user_partial_is_valid() {
        let payload = UpdateUser {
            first_name: Some("Neo".to_string()),
            ..Default::default()
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_update_user_bad_email() {
        let payload = UpdateUser {
            email: Some("broken".to_string()),
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }
}
