//! Domain error types.

use document_store::DocumentStoreError;
use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Input violated a schema constraint.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// No document matched the given identifier.
    #[error("{collection} not found: {id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// An error occurred in the document store.
    #[error("Document store error: {0}")]
    Store(#[from] DocumentStoreError),
}

impl DomainError {
    /// Returns true if the error was caused by a malformed identifier.
    pub fn is_identifier_format(&self) -> bool {
        matches!(
            self,
            DomainError::Store(DocumentStoreError::IdentifierFormat(_))
        )
    }
}
