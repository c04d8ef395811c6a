//! MongoDB error types.

use thiserror::Error;

/// Result type for store operations.
pub type MongoResult<T> = Result<T, MongoError>;

/// Errors that can occur while talking to the document store.
#[derive(Debug, Error)]
pub enum MongoError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid document id: {0}")]
    InvalidId(#[from] bson::oid::Error),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),
}

impl MongoError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
