//! Custom error types for the authentication library

use thiserror::Error;

/// Errors raised while checking credentials or tokens
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or username was not supplied
    #[error("Please enter email and username")]
    MissingCredentials,

    /// No user matches the given email or username
    #[error("Incorrect account or email")]
    UserNotFound,

    /// The password does not match the stored hash
    #[error("Incorrect password")]
    InvalidPassword,

    /// The token failed signature, format or expiry checks
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token was explicitly revoked by a logout
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Hashing or parsing a password hash failed
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Type alias for Result with AuthError
pub type AuthResult<T> = Result<T, AuthError>;
