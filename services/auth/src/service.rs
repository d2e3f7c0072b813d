//! Credential check and token lifecycle

use anyhow::Result;
use common::config::AppConfig;
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    jwt::{Claims, JwtConfig, JwtService},
    models::{IssuedToken, LoginCredentials, User},
    repositories::UserDirectory,
    revocation::RevocationList,
};

/// Authentication service combining the user directory, the token signer
/// and the revocation list
#[derive(Clone)]
pub struct AuthService {
    users: UserDirectory,
    jwt_service: JwtService,
    revocations: RevocationList,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(users: UserDirectory, jwt_service: JwtService) -> Self {
        Self {
            users,
            jwt_service,
            revocations: RevocationList::new(),
        }
    }

    /// Build the service from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let users = UserDirectory::load(
            config.users_file.as_deref(),
            &config.default_admin_password,
        )?;
        let jwt_config = JwtConfig::new(config.secret_key.clone(), config.token_ttl_secs);

        Ok(Self::new(users, JwtService::new(jwt_config)))
    }

    /// Check credentials and issue a token
    ///
    /// Email and username must both be present; the user is matched on
    /// either of them. Password hashing is CPU bound, callers on an async
    /// runtime should run this on a blocking thread.
    pub fn login(&self, credentials: &LoginCredentials) -> AuthResult<IssuedToken> {
        let email = non_empty(&credentials.email);
        let username = non_empty(&credentials.username);
        let (Some(email), Some(username)) = (email, username) else {
            debug!("Login rejected: missing email or username");
            return Err(AuthError::MissingCredentials);
        };

        info!("Login attempt for user: {}", username);

        let user = self
            .users
            .find_by_email_or_username(email, username)
            .ok_or_else(|| {
                warn!("Login failed: no user for {} / {}", email, username);
                AuthError::UserNotFound
            })?;

        let password = credentials.password.as_deref().unwrap_or_default();
        if !self.users.verify_password(user, password)? {
            warn!("Login failed: bad password for user {}", user.id);
            return Err(AuthError::InvalidPassword);
        }

        let (token, claims) = self.jwt_service.generate_token(user)?;
        info!("Issued token for user {}", user.id);

        Ok(IssuedToken {
            token,
            user_id: user.id,
            expires_at: claims.expires_at(),
        })
    }

    /// Validate a bearer token, rejecting revoked ones
    pub async fn authenticate(&self, token: &str) -> AuthResult<Claims> {
        let claims = self.jwt_service.validate_token(token)?;

        if self.revocations.is_revoked(&claims.jti).await {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Revoke the presented token, if any
    ///
    /// Never fails: an absent or invalid token is simply ignored. Returns
    /// whether a token was revoked.
    pub async fn logout(&self, token: Option<&str>) -> bool {
        let Some(token) = token else {
            return false;
        };

        match self.jwt_service.validate_token(token) {
            Ok(claims) => {
                self.revocations.revoke(claims.jti, claims.exp).await;
                info!("User {} logged out", claims.user_id);
                true
            }
            Err(e) => {
                debug!("Ignoring invalid token on logout: {}", e);
                false
            }
        }
    }

    /// Look up the user a set of claims belongs to
    pub fn user(&self, claims: &Claims) -> Option<&User> {
        self.users.find_by_id(claims.user_id)
    }

    /// Get the token lifetime in seconds
    pub fn token_ttl_secs(&self) -> u64 {
        self.jwt_service.token_ttl_secs()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
