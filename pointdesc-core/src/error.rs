//! Error types for pointdesc

use thiserror::Error;

/// Main error type for pointdesc operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pointdesc operations
pub type Result<T> = std::result::Result<T, Error>;
