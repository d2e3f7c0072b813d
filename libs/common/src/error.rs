//! Custom error types for the common library
//!
//! This module defines the errors raised while loading and validating the
//! service configuration.

use thiserror::Error;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error raised by the underlying configuration sources
    #[error("Configuration load error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
