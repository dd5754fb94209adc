use async_trait::async_trait;

use crate::{Document, DocumentId, Fields, Filter, Result};

/// Number of documents `list_default` returns.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Read-modify-write step run by [`DocumentStore::upsert_with`].
///
/// Receives the current body of the matching document, or `None` when no
/// document matches, and returns the complete body to persist.
pub type Mutation = Box<dyn FnOnce(Option<Fields>) -> Result<Fields> + Send>;

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No document matched; a new one was inserted.
    Created(DocumentId),
    /// The matching document was rewritten.
    Updated(DocumentId),
}

impl UpsertOutcome {
    /// Returns the ID of the affected document.
    pub fn id(&self) -> DocumentId {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => *id,
        }
    }

    /// Returns true if a new document was inserted.
    pub fn is_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

/// Core trait for document store implementations.
///
/// Documents live in named collections. Implementations own the identifier
/// and the `created_at`/`updated_at` timestamps; callers only ever supply
/// body fields. All implementations must be thread-safe (Send + Sync).
///
/// Each operation is a single atomic call against the backend. Nothing is
/// cached or retried.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a document and returns its new ID.
    ///
    /// Both timestamps are set to the same current time. No uniqueness
    /// constraints are applied.
    async fn create(&self, collection: &str, data: Fields) -> Result<DocumentId>;

    /// Overwrites the given fields on the first document matching `filter`.
    ///
    /// Fields absent from `data` are left untouched and `updated_at` is
    /// refreshed. Returns the number of documents modified: 0 or 1.
    async fn update(&self, collection: &str, filter: &Filter, data: Fields) -> Result<u64>;

    /// Returns up to `limit` documents matching `filter`.
    ///
    /// Documents come back in storage order; no sort is applied.
    async fn list(&self, collection: &str, filter: &Filter, limit: usize)
    -> Result<Vec<Document>>;

    /// Returns the first document matching `filter`, if any.
    async fn get_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>>;

    /// Removes the first document matching `filter`.
    ///
    /// Returns the number of documents removed: 0 or 1.
    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Atomically rewrites the first document matching `filter`, or inserts
    /// a new one when nothing matches.
    ///
    /// Concurrent upserts with the same collection and filter are
    /// serialized, so `mutation` always sees the latest committed body.
    async fn upsert_with(
        &self,
        collection: &str,
        filter: &Filter,
        mutation: Mutation,
    ) -> Result<UpsertOutcome>;
}

/// Extension trait providing convenience methods for document stores.
#[async_trait]
pub trait DocumentStoreExt: DocumentStore {
    /// Lists matching documents with the default limit.
    async fn list_default(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>> {
        self.list(collection, filter, DEFAULT_LIST_LIMIT).await
    }

    /// Checks if any document matches.
    async fn exists(&self, collection: &str, filter: &Filter) -> Result<bool> {
        Ok(self.get_one(collection, filter).await?.is_some())
    }
}

// Blanket implementation for all DocumentStore implementations
impl<T: DocumentStore + ?Sized> DocumentStoreExt for T {}
