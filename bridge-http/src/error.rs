use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP transport failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

pub type Result<T> = std::result::Result<T, HttpError>;
