//! Store error types.

use thiserror::Error;

/// Errors from configuration and report persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error; the message names the variable.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Builds a configuration error for `variable`.
    pub fn config(variable: &str, problem: impl std::fmt::Display) -> Self {
        Self::Config(format!("{variable}: {problem}"))
    }

    /// Returns a suggested fix the user can act on, if one is known.
    pub fn remedy(&self) -> Option<&'static str> {
        match self {
            Self::Io(_) => Some("check that the output directory is writable"),
            Self::Config(_) => Some("set the variable in the environment or a .env loader"),
            Self::Serialization(_) => None,
        }
    }
}
