//! Request/Response DTOs

use authgate_db::User;
use serde::{Deserialize, Serialize};

/// Register and login request body
///
/// Missing fields deserialize as empty strings and are rejected by
/// input validation rather than by the JSON extractor.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Plain message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// User response (without password)
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Profile response
#[derive(Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserResponse,
}
