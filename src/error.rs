//! Error types for doyline.
//!
//! A single error enum covers date parsing, configuration, layout and
//! rendering failures.

use thiserror::Error;

/// The main error type for doyline operations.
#[derive(Error, Debug)]
pub enum DoylineError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A date string that is not a well-formed YYYYMMDD calendar date
    #[error("Invalid date '{input}': {message}")]
    InvalidDate { input: String, message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Nothing to draw
    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with DoylineError
pub type Result<T> = std::result::Result<T, DoylineError>;
