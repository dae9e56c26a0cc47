//! Core error types for ghpilot.

use thiserror::Error;

/// Core error type for ghpilot operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data, either from an API response or from user input.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
