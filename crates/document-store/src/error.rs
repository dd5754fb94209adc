use common::InvalidDocumentId;
use thiserror::Error;

/// Errors that can occur when interacting with the document store.
///
/// A filter that matches nothing is not an error: operations report it
/// through a zero count or `None`.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// An external identifier could not be parsed into a native document ID.
    #[error("Invalid identifier: {0}")]
    IdentifierFormat(#[from] InvalidDocumentId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, DocumentStoreError>;
