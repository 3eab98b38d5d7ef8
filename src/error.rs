//! # Error Types
//!
//! Custom error types for propo-link using `thiserror`.

use thiserror::Error;

/// Main error type for propo-link
#[derive(Debug, Error)]
pub enum PropoError {
    /// Network link errors (bind/send)
    #[error("Link error: {0}")]
    Link(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for propo-link
pub type Result<T> = std::result::Result<T, PropoError>;
