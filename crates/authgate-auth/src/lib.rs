//! authgate authentication
//!
//! Password hashing with Argon2id, JWT issuing and verification, and the
//! axum middleware that gates protected routes on a bearer token.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use middleware::{AuthUser, auth_middleware};
pub use password::{hash_password, verify_password};
