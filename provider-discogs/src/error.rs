//! Error types for the Discogs provider

use thiserror::Error;

/// Discogs provider errors
#[derive(Error, Debug)]
pub enum DiscogsError {
    /// The target user does not exist upstream
    #[error("Discogs user '{user}' not found (status {status_code}): {message}")]
    UnknownUser {
        user: String,
        status_code: u16,
        message: String,
    },

    /// The configured personal token is not valid for any account
    #[error("The Discogs token provided for '{user}' is invalid; update the token and retry")]
    InvalidToken { user: String },

    /// API request returned an unexpected error status
    #[error("Discogs API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse Discogs response: {0}")]
    ParseError(String),

    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] bridge_http::HttpError),
}

/// Result type for Discogs operations
pub type Result<T> = std::result::Result<T, DiscogsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DiscogsError::UnknownUser {
            user: "nobody".to_string(),
            status_code: 404,
            message: "User does not exist or may have been deleted.".to_string(),
        };

        assert!(error.to_string().contains("nobody"));
        assert!(error.to_string().contains("404"));
    }
}
