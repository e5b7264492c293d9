//! Token-gated profile route

use authgate_auth::{AuthUser, auth_middleware};
use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{ProfileResponse, UserResponse};

/// GET /profile
async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    metrics::counter!("authgate_profile_requests_total").increment(1);

    let user = state
        .db
        .get_user_by_id(&auth_user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    debug!("Serving profile for {}", user.username);

    Ok(Json(ProfileResponse {
        message: "Access granted to profile".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Create profile routes, gated by the bearer token middleware
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile))
        .route_layer(from_fn_with_state(state.jwt.clone(), auth_middleware))
}
