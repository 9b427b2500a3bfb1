use thiserror::Error;

/// Errors that can occur during key-value store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Transaction of {count} items exceeds the limit of {max}")]
    TransactionTooLarge { count: usize, max: usize },
    #[error("Transaction canceled: {0}")]
    TransactionCanceled(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
