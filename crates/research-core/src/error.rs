//! Error types for research-core

use thiserror::Error;

/// Result type alias for research-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for chain operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// A chain expected a variable that nobody provided
    #[error("Missing chain variable: {0}")]
    MissingVariable(String),

    /// Chain construction failed
    #[error("Chain initialization failed: {0}")]
    InitializationFailed(String),

    /// Chain execution failed
    #[error("Chain processing failed: {0}")]
    ProcessingFailed(String),
}
