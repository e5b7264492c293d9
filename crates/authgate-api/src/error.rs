//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] authgate_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] authgate_auth::AuthError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::UsernameTaken => {
                (StatusCode::BAD_REQUEST, "Username already exists.".to_string())
            }
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid credentials.".to_string())
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_MESSAGE.to_string(),
            ),
            ApiError::Database(e) => match e {
                authgate_db::DbError::Duplicate(_) => {
                    (StatusCode::BAD_REQUEST, "Username already exists.".to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                ),
            },
            ApiError::Auth(e) => (e.status_code(), e.public_message().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Detail stays in the logs, never in the response body
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = axum::Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}
