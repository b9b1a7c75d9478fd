//! Error handling for the Shade core layer.
//!
//! The main error type for this crate is [`CoreError`], which wraps the more
//! specific [`ConfigError`] and [`LoggingError`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type shared by every Shade crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while installing the global logging subscriber.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem failures not covered by a more specific variant.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O errors.
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),

    /// Invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsing succeeded but a value is out of range or unknown.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (e.g. XDG config home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The subscriber could not be installed or the configuration was rejected.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// A filter directive could not be parsed.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),
}
