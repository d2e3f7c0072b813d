//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret. Each token carries a
//! random `jti` so that it can be revoked individually.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::models::User;

/// Length of a generated signing secret
const GENERATED_SECRET_LEN: usize = 64;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret used for signing and verifying tokens
    pub secret: String,
    /// Token lifetime in seconds (default: 1 hour)
    pub token_ttl_secs: u64,
}

impl JwtConfig {
    /// Create a configuration, generating a random secret when none is given
    pub fn new(secret: Option<String>, token_ttl_secs: u64) -> Self {
        let secret = secret.unwrap_or_else(|| {
            warn!("No SECRET_KEY configured, tokens will not survive a restart");
            generate_secret()
        });

        Self {
            secret,
            token_ttl_secs,
        }
    }
}

/// Generate a random alphanumeric signing secret
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User ID
    #[serde(rename = "userId")]
    pub user_id: u64,
    /// Token ID, used as the revocation handle
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl Claims {
    /// Expiration time as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.exp)
            .ok()
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .unwrap_or_default()
    }
}

/// Current Unix time in seconds
pub(crate) fn now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Generate a token for a user, returning it with its claims
    pub fn generate_token(&self, user: &User) -> AuthResult<(String, Claims)> {
        let now = now_secs();

        let claims = Claims {
            user_id: user.id,
            jti: Uuid::new_v4(),
            iat: now,
            exp: now.saturating_add(self.config.token_ttl_secs),
        };

        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    fn encode_claims(&self, claims: &Claims) -> AuthResult<String> {
        let token = encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> AuthResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token lifetime in seconds
    pub fn token_ttl_secs(&self) -> u64 {
        self.config.token_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig::new(Some(secret.to_string()), 3600))
    }

    fn user() -> User {
        User {
            id: 42,
            username: "neo".to_string(),
            email: "neo@matrix.io".to_string(),
            password_hash: String::new(),
        }
    }

    #[test]
    fn test_generated_token_round_trips_claims() {
        let jwt = service("test-secret");
        let (token, claims) = jwt.generate_token(&user()).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp - claims.iat, 3600);

        let validated = jwt.validate_token(&token).unwrap();
        assert_eq!(validated, claims);
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let (token, _) = service("secret-a").generate_token(&user()).unwrap();

        let result = service("secret-b").validate_token(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service("test-secret");
        let now = now_secs();
        let claims = Claims {
            user_id: 42,
            jti: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = jwt.encode_claims(&claims).unwrap();

        let err = jwt.validate_token(&token).unwrap_err();
        match err {
            AuthError::InvalidToken(e) => assert!(matches!(
                e.kind(),
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
            )),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_secret_generates_one() {
        let config = JwtConfig::new(None, 60);
        assert_eq!(config.secret.len(), GENERATED_SECRET_LEN);
        assert_ne!(config.secret, JwtConfig::new(None, 60).secret);
    }

    #[test]
    fn test_token_payload_uses_user_id_claim() {
        let jwt = service("test-secret");
        let (token, _) = jwt.generate_token(&user()).unwrap();

        let claims: serde_json::Value =
            serde_json::to_value(jwt.validate_token(&token).unwrap()).unwrap();
        assert_eq!(claims["userId"], 42);
    }

    #[test]
    fn test_huge_ttl_saturates_expiry() {
        let jwt = JwtService::new(JwtConfig::new(Some("test-secret".to_string()), u64::MAX));
        let (_, claims) = jwt.generate_token(&user()).unwrap();

        assert_eq!(claims.exp, u64::MAX);
        assert_eq!(claims.expires_at(), DateTime::<Utc>::default());
    }
}
