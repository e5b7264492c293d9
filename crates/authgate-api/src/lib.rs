//! authgate REST API
//!
//! Axum router and handlers for registration, login and the
//! token-gated profile endpoint.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{cors_layer, create_router};
pub use state::{AppState, MetricsHandle};
