//! Error types for the index client

use thiserror::Error;

/// Index client errors
#[derive(Error, Debug)]
pub enum IndexError {
    /// Index service returned an unexpected error status
    #[error("Index service error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an index service response
    #[error("Failed to parse index response: {0}")]
    ParseError(String),

    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] bridge_http::HttpError),
}

/// Result type for index operations
pub type Result<T> = std::result::Result<T, IndexError>;
