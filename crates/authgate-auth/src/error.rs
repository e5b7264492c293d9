//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Token missing")]
    InvalidAuthHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// HTTP status for this error
    ///
    /// A missing header means the caller is not authenticated (401); a
    /// header that is present but unusable means authentication was
    /// rejected (403).
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader => StatusCode::UNAUTHORIZED,
            AuthError::InvalidAuthHeader | AuthError::InvalidToken | AuthError::TokenExpired => {
                StatusCode::FORBIDDEN
            }
            AuthError::PasswordHash(_) | AuthError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message, free of internal detail
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "Missing authorization header",
            AuthError::InvalidAuthHeader => "Token missing",
            AuthError::InvalidToken | AuthError::TokenExpired => "Invalid or expired token",
            AuthError::PasswordHash(_) | AuthError::Jwt(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Authentication failure: {}", self);
        }

        let body = axum::Json(json!({
            "message": self.public_message()
        }));

        (status, body).into_response()
    }
}
