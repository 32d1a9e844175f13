//! Shared ambient helpers for the local agent workspace
//!
//! # Modules
//!
//! - `config` - Environment-variable overrides and the layered `ConfigBuilder` trait
//! - `logging` - Tracing initialisation, timing helpers and log redaction

pub mod config;
pub mod logging;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// An environment variable was present but unusable
    #[error("Invalid environment variable {key}: {message}")]
    InvalidEnv { key: String, message: String },

    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
