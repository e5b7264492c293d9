//! Registration and login routes

use authgate_auth::{hash_password, verify_password};
use authgate_db::NewUser;
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{CredentialsRequest, LoginResponse, MessageResponse};

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (bounds the hashing cost)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate username format and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required.".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters.",
            MAX_USERNAME_LENGTH
        )));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens."
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate password presence and length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password is required.".to_string()));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters.",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash verified against when the username does not exist, so a login
/// for an unknown user costs the same as one with a wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("authgate-timing-equalizer").unwrap_or_default());

fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(format!("Task join error: {}", e))
}

// ==================== Auth Routes ====================

/// POST /register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    if state.db.get_user_by_username(&request.username).await?.is_some() {
        debug!("Registration rejected, username taken: {}", request.username);
        return Err(ApiError::UsernameTaken);
    }

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_error)??;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            password_hash,
        })
        .await?;

    metrics::counter!("authgate_registrations_total").increment(1);
    info!("Registered user {} ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully.")),
    ))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Invalid input never reveals which rule failed
    if validate_username(&request.username).is_err() || validate_password(&request.password).is_err()
    {
        metrics::counter!("authgate_logins_total", "result" => "rejected").increment(1);
        return Err(ApiError::InvalidCredentials);
    }

    debug!("Login attempt for user: {}", request.username);

    let candidate = state.db.get_user_by_username(&request.username).await?;

    // Always run one verification, against a dummy hash for unknown users
    let stored_hash = candidate.as_ref().map(|u| u.password_hash.clone());
    let password = request.password;
    let password_valid = tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            let _ = verify_password(&password, &DUMMY_HASH);
            Ok(false)
        }
    })
    .await
    .map_err(join_error)??;

    let user = match (candidate, password_valid) {
        (Some(u), true) => u,
        _ => {
            metrics::counter!("authgate_logins_total", "result" => "rejected").increment(1);
            warn!("Failed login for user: {}", request.username);
            return Err(ApiError::InvalidCredentials);
        }
    };

    let token = state.jwt.generate_token(&user.id, &user.username)?;

    metrics::counter!("authgate_logins_total", "result" => "success").increment(1);
    info!("User {} logged in successfully", user.username);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt.token_ttl_secs(),
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
