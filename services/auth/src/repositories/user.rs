//! User directory backed by a static list
//!
//! The directory is either read from a JSON file or seeded with a single
//! default `admin` account. It is never written to at runtime.

use anyhow::{Context, Result};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};
use crate::models::User;

/// Identifier of the seeded default user
pub const DEFAULT_ADMIN_ID: u64 = 1;
/// Username of the seeded default user
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
/// Email of the seeded default user
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hashing(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Read-only user directory
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Arc<Vec<User>>,
}

impl UserDirectory {
    /// Create a directory from an already loaded list
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(users),
        }
    }

    /// Build the directory from `users_file`, or seed the default admin
    /// account when no file is configured
    pub fn load(users_file: Option<&Path>, default_admin_password: &str) -> Result<Self> {
        match users_file {
            Some(path) => Self::from_file(path),
            None => {
                warn!(
                    "No users file configured, seeding default user '{}'",
                    DEFAULT_ADMIN_USERNAME
                );
                Self::with_default_admin(default_admin_password)
            }
        }
    }

    /// Read a JSON array of users from disk
    ///
    /// Every password hash is parsed up front so a malformed entry fails the
    /// startup instead of a later login.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read users file {}", path.display()))?;
        let users: Vec<User> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse users file {}", path.display()))?;

        for user in &users {
            PasswordHash::new(&user.password_hash).map_err(|e| {
                anyhow::anyhow!("Invalid password hash for user '{}': {}", user.username, e)
            })?;
        }

        info!("Loaded {} users from {}", users.len(), path.display());
        Ok(Self::new(users))
    }

    /// Directory holding only the default admin account
    pub fn with_default_admin(password: &str) -> Result<Self> {
        let password_hash = hash_password(password)?;

        Ok(Self::new(vec![User {
            id: DEFAULT_ADMIN_ID,
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            email: DEFAULT_ADMIN_EMAIL.to_string(),
            password_hash,
        }]))
    }

    /// Find the first user whose email or username matches
    pub fn find_by_email_or_username(&self, email: &str, username: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.email == email || user.username == username)
    }

    /// Find a user by ID
    pub fn find_by_id(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> AuthResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AuthError::Hashing(format!("Failed to parse password hash: {}", e)))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
