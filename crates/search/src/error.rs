use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Store error: {0}")]
    StoreError(#[from] dex_store::StoreError),

    #[error("limit must be a positive integer")]
    InvalidLimit,
}

impl SearchError {
    /// Lexical path unavailable because the store has no text index.
    #[must_use]
    pub const fn is_index_missing(&self) -> bool {
        matches!(
            self,
            SearchError::StoreError(dex_store::StoreError::TextIndexMissing)
        )
    }
}
