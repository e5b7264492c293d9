//! API routes

mod auth;
mod health;
pub mod metrics;
mod profile;
pub mod types;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::state::{AppState, MetricsHandle};

/// Build the CORS layer
///
/// An empty list (or a `*` entry) allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the main router
pub fn create_router(
    state: AppState,
    cors: CorsLayer,
    metrics_handle: Option<MetricsHandle>,
) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(profile::routes(&state))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use authgate_auth::JwtManager;
    use authgate_db::Database;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret-key";

    async fn app_with(cors: CorsLayer, metrics_handle: Option<MetricsHandle>) -> (TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        let db = Database::new(&url).await.unwrap();
        let state = AppState::new(db, Arc::new(JwtManager::new(TEST_SECRET, 3600)));
        (dir, create_router(state, cors, metrics_handle))
    }

    async fn test_app() -> (TempDir, Router) {
        app_with(cors_layer(&[]), None).await
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        auth: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/register",
            Some(json!({"username": username, "password": password})),
            None,
        )
        .await
    }

    async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/login",
            Some(json!({"username": username, "password": password})),
            None,
        )
        .await
    }

    #[tokio::test]
    async fn test_register_login_profile_flow() {
        let (_dir, app) = test_app().await;

        let (status, body) = register(&app, "alice", "pw123").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully.");

        let (status, body) = login(&app, "alice", "pw123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expires_in"], 3600);
        let token = body["token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());

        let bearer = format!("Bearer {}", token);
        let (status, body) = send(&app, Method::GET, "/profile", None, Some(&bearer)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Access granted to profile");
        assert_eq!(body["user"]["username"], "alice");
        assert!(body["user"]["id"].as_str().is_some());
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("password_hash").is_none());
        assert!(!body.to_string().contains("argon2"));
    }

    #[tokio::test]
    async fn test_profile_gate_statuses() {
        let (_dir, app) = test_app().await;

        let (status, body) = send(&app, Method::GET, "/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Missing authorization header");

        let (status, body) = send(&app, Method::GET, "/profile", None, Some("Bearer")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Token missing");

        let (status, body) =
            send(&app, Method::GET, "/profile", None, Some("Bearer garbage")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (_dir, app) = test_app().await;
        register(&app, "alice", "pw123").await;

        let expired = JwtManager::new(TEST_SECRET, -3600)
            .generate_token("any-id", "alice")
            .unwrap();
        let bearer = format!("Bearer {}", expired);

        let (status, body) = send(&app, Method::GET, "/profile", None, Some(&bearer)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_is_not_found() {
        let (_dir, app) = test_app().await;

        let token = JwtManager::new(TEST_SECRET, 3600)
            .generate_token("missing-id", "ghost")
            .unwrap();
        let bearer = format!("Bearer {}", token);

        let (status, body) = send(&app, Method::GET, "/profile", None, Some(&bearer)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let (_dir, app) = test_app().await;

        assert_eq!(register(&app, "alice", "pw123").await.0, StatusCode::CREATED);

        let (status, body) = register(&app, "alice", "other-password").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username already exists.");

        // The first password still works, the second never took effect
        assert_eq!(login(&app, "alice", "pw123").await.0, StatusCode::OK);
        assert_eq!(
            login(&app, "alice", "other-password").await.0,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_wrong_password_indistinguishable_from_unknown_user() {
        let (_dir, app) = test_app().await;
        register(&app, "alice", "pw123").await;

        let wrong_password = login(&app, "alice", "nope").await;
        let unknown_user = login(&app, "bob", "pw123").await;

        assert_eq!(wrong_password.0, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.1["message"], "Invalid credentials.");
    }

    #[tokio::test]
    async fn test_registration_input_validation() {
        let (_dir, app) = test_app().await;

        let (status, body) = register(&app, "", "pw123").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username is required.");

        let (status, body) = register(&app, "alice", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password is required.");

        let (status, _) = register(&app, "alice smith", "pw123").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::POST, "/register", Some(json!({})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_missing_fields() {
        let (_dir, app) = test_app().await;

        let (status, body) = send(&app, Method::POST, "/login", Some(json!({})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials.");
    }

    #[tokio::test]
    async fn test_health_and_cors() {
        let (_dir, app) = test_app().await;

        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let (_dir, app) =
            app_with(cors_layer(&["http://allowed.example".to_string()]), None).await;

        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://other.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_metrics_route_mounted_when_enabled() {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let (_dir, app) = app_with(cors_layer(&[]), Some(handle)).await;

        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
    }
}
