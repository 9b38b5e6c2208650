//! Core error types for muteroll-core.
//!
//! This module defines the error hierarchy using thiserror. Evaluator and
//! duration errors live next to their modules ([`crate::expr::ExprError`],
//! [`crate::duration::DurationError`]); storage and configuration errors plus
//! the top-level umbrella live here.

use std::path::PathBuf;
use thiserror::Error;

use crate::duration::DurationError;
use crate::expr::ExprError;

/// Core error type for muteroll-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Arithmetic expression errors
    #[error("expression error: {0}")]
    Expression(#[from] ExprError),

    /// Duration parsing errors
    #[error("duration error: {0}")]
    Duration(#[from] DurationError),

    /// Record/mute store errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read or write a store file
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize store contents
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data directory could not be resolved
    #[error("failed to access data directory: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("failed to access configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the configuration
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved
    #[error("failed to access data directory: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
