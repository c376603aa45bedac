use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Text index is not configured for this catalog")]
    TextIndexMissing,

    #[error("Duplicate record name: {0}")]
    DuplicateName(String),

    #[error("Unsupported catalog schema_version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
