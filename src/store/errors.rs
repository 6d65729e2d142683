//! Store errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised while executing a query or loading data
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Store could not be reached or its state is unusable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Query shape the store cannot execute
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Seed data could not be read or parsed
    #[error("invalid seed data: {0}")]
    InvalidSeed(String),

    /// Document body could not be mapped into the requested type
    #[error("document '{id}' could not be decoded: {reason}")]
    Decode { id: String, reason: String },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
            StoreError::InvalidQuery(_) => "STORE_INVALID_QUERY",
            StoreError::InvalidSeed(_) => "STORE_INVALID_SEED",
            StoreError::Decode { .. } => "STORE_DECODE_FAILED",
        }
    }
}
