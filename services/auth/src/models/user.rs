//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
///
/// Users are read from the directory file once at startup and never change
/// while the service runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Argon2 hash in PHC string format
    pub password_hash: String,
}

/// User login credentials
///
/// Every field is optional so that a missing value can be reported as a
/// caller error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Token handed out after a successful login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
}
