use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Catalog-side failure, including the fatal pre-flight rejections
    #[error(transparent)]
    Source(#[from] provider_discogs::DiscogsError),

    /// Index-side failure
    #[error(transparent)]
    Index(#[from] index_elastic::IndexError),
}

impl SyncError {
    /// Whether this error is a fatal user-input problem (unknown user or
    /// invalid token) rather than an operational failure.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            SyncError::Source(
                provider_discogs::DiscogsError::UnknownUser { .. }
                    | provider_discogs::DiscogsError::InvalidToken { .. }
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
