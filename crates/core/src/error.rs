//! Error types for docseek.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, LLM, document store, decoding,
//! prompt and serialization errors.

use thiserror::Error;

/// Unified error type for docseek.
///
/// All fallible functions return `Result<T, AppError>`.
/// Snippet extraction itself never fails; errors come from collaborators.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document store errors (search, download, export)
    #[error("Store error: {0}")]
    Store(String),

    /// Document decoding errors
    #[error("Decode error: {0}")]
    Decode(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
