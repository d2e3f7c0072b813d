//! Configuration module for the film catalog service
//!
//! Settings are layered with the `config` crate: built-in defaults, an
//! optional configuration file, `FILMS_`-prefixed environment variables and
//! finally the unprefixed `PORT` and `SECRET_KEY` variables.

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};

/// Prefix of the environment variables read by [`AppConfig::from_env`]
pub const ENV_PREFIX: &str = "FILMS";

/// Environment variable naming the configuration file (without extension)
pub const CONFIG_FILE_VAR: &str = "FILMS_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "catalog";

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// HMAC secret used to sign session tokens. A random one is generated
    /// when unset.
    pub secret_key: Option<String>,
    /// Lifetime of an issued token in seconds (default: 1 hour)
    pub token_ttl_secs: u64,
    /// JSON file holding the user directory
    pub users_file: Option<PathBuf>,
    /// Password of the seeded `admin` user when no users file is given
    pub default_admin_password: String,
    /// JSON file with films to preload into the store
    pub films_file: Option<PathBuf>,
    /// Directory uploaded images are written to
    pub uploads_dir: PathBuf,
    /// Maximum accepted size of a multipart upload body in bytes
    pub max_upload_bytes: usize,
    /// Require a bearer token for film mutations and uploads
    pub require_auth_for_writes: bool,
    /// Tracing filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            secret_key: None,
            token_ttl_secs: 3600,
            users_file: None,
            default_admin_password: "password".to_string(),
            films_file: None,
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
            require_auth_for_writes: false,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the file named by `FILMS_CONFIG` and the
    /// process environment
    ///
    /// # Environment Variables
    /// - `FILMS_CONFIG`: configuration file name, extension optional (default: "catalog")
    /// - `FILMS_<KEY>`: any field of [`AppConfig`], e.g. `FILMS_UPLOADS_DIR`
    /// - `PORT`: overrides `port`
    /// - `SECRET_KEY`: overrides `secret_key`
    pub fn from_env() -> ConfigResult<Self> {
        let file = env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        debug!("Reading configuration file '{}' if present", file);

        let settings = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("port", env::var("PORT").ok())?
            .set_override_option("secret_key", env::var("SECRET_KEY").ok())?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        info!(
            "Configuration loaded (file '{}', {}_* environment)",
            file, ENV_PREFIX
        );
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "token_ttl_secs must be greater than zero".to_string(),
            ));
        }

        if self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "token_ttl_secs must not exceed {}",
                MAX_TOKEN_TTL_SECS
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        if self.uploads_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("uploads_dir must not be empty".to_string()));
        }

        if matches!(&self.secret_key, Some(secret) if secret.is_empty()) {
            return Err(ConfigError::Invalid("secret_key must not be empty".to_string()));
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            env::remove_var("PORT");
            env::remove_var("SECRET_KEY");
            env::remove_var("FILMS_PORT");
            env::remove_var("FILMS_UPLOADS_DIR");
            env::remove_var("FILMS_TOKEN_TTL_SECS");
            env::remove_var("FILMS_REQUIRE_AUTH_FOR_WRITES");
            env::remove_var(CONFIG_FILE_VAR);
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl_secs, 3600);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert!(config.secret_key.is_none());
        assert!(!config.require_auth_for_writes);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_config_from_prefixed_env() {
        clear_env();
        unsafe {
            env::set_var("FILMS_PORT", "9000");
            env::set_var("FILMS_UPLOADS_DIR", "/tmp/posters");
            env::set_var("FILMS_REQUIRE_AUTH_FOR_WRITES", "true");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/posters"));
        assert!(config.require_auth_for_writes);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unprefixed_port_and_secret_win() {
        clear_env();
        unsafe {
            env::set_var("FILMS_PORT", "9000");
            env::set_var("PORT", "3001");
            env::set_var("SECRET_KEY", "s3cr3t");
        }

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.secret_key.as_deref(), Some("s3cr3t"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_zero_ttl_is_rejected() {
        clear_env();
        unsafe {
            env::set_var("FILMS_TOKEN_TTL_SECS", "0");
        }

        let result = AppConfig::from_env();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_oversized_ttl_is_rejected() {
        clear_env();
        unsafe {
            env::set_var("FILMS_TOKEN_TTL_SECS", (MAX_TOKEN_TTL_SECS + 1).to_string());
        }

        let result = AppConfig::from_env();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        clear_env();

        let config = AppConfig {
            token_ttl_secs: MAX_TOKEN_TTL_SECS,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
