//! authgate credential store
//!
//! Persists user records in SQLite via sqlx and exposes lookups by
//! username and by identifier.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
