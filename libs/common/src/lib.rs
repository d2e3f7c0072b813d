//! Common library for the film catalog
//!
//! This crate provides functionality shared by the catalog services:
//! layered configuration loading, configuration errors and tracing setup.
//!
//! ```rust,no_run
//! use common::{config::AppConfig, telemetry::init_tracing};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::from_env()?;
//!     init_tracing(&config.log_filter)?;
//!     println!("Listening on {}", config.bind_address());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod telemetry;
