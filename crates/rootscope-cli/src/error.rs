//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid tolerance.
    #[error("Invalid tolerance: {0}. Must be positive and finite.")]
    InvalidTolerance(f64),

    /// Invalid iteration cap.
    #[error("Invalid iteration limit: {0}. Must be at least 1.")]
    InvalidMaxIterations(u32),

    /// Only one end of the bracket was given.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Unknown configuration key.
    #[error("Unknown configuration key: {0}")]
    UnknownConfigKey(String),

    /// Configuration value rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
