//! Authentication library for the film catalog
//!
//! Checks login credentials against a static user directory and issues
//! HS256-signed tokens that expire after a fixed lifetime. Tokens presented
//! at logout are revoked until they expire.

pub mod error;
pub mod jwt;
pub mod models;
pub mod repositories;
pub mod revocation;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, JwtConfig, JwtService};
pub use models::{IssuedToken, LoginCredentials, User};
pub use repositories::UserDirectory;
pub use service::AuthService;
