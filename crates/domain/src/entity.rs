//! Mapping between typed entities and store documents.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use document_store::{Document, DocumentId, DocumentStore, Fields, Filter, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

/// Number of documents returned by the listing operations.
pub const LIST_LIMIT: usize = 200;

/// A typed record stored in its own collection.
///
/// The default mapping goes through serde: the entity must serialize to a
/// JSON object whose keys become the document fields.
pub trait Entity: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    /// Name of the collection holding this entity.
    const COLLECTION: &'static str;

    /// Converts the entity into a document body.
    fn to_fields(&self) -> Result<Fields, DomainError> {
        Ok(encode(self)?)
    }

    /// Rebuilds the entity, with its identifier and timestamps, from a document.
    fn from_document(document: &Document) -> Result<Persisted<Self>, DomainError> {
        Ok(Persisted {
            id: Some(document.id.to_string()),
            entity: document.decode()?,
            created_at: Some(document.created_at),
            updated_at: Some(document.updated_at),
        })
    }
}

/// Output view of an entity.
///
/// The identifier and timestamps are absent until the entity is persisted.
/// The entity's own fields are flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persisted<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub entity: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Persisted<T> {
    /// Wraps an entity that has not been stored yet.
    pub fn unsaved(entity: T) -> Self {
        Self {
            id: None,
            entity,
            created_at: None,
            updated_at: None,
        }
    }

    /// Returns true once the entity has an identifier.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Typed CRUD over one collection.
///
/// Validates entities before they reach the store and turns the store's
/// zero counts and `None` results into `DomainError::NotFound`.
pub struct Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    store: S,
    _phantom: PhantomData<E>,
}

impl<S, E> Repository<S, E>
where
    S: DocumentStore,
    E: Entity,
{
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and inserts an entity, returning its new identifier.
    pub async fn insert(&self, entity: &E) -> Result<DocumentId, DomainError> {
        entity.validate()?;
        let id = self.store.create(E::COLLECTION, entity.to_fields()?).await?;
        metrics::counter!("documents_created_total", "collection" => E::COLLECTION).increment(1);
        Ok(id)
    }

    /// Lists up to `limit` entities matching `filter`.
    pub async fn list(&self, filter: &Filter, limit: usize) -> Result<Vec<Persisted<E>>, DomainError> {
        self.store
            .list(E::COLLECTION, filter, limit)
            .await?
            .iter()
            .map(E::from_document)
            .collect()
    }

    /// Loads an entity by its external identifier.
    pub async fn find(&self, id: &str) -> Result<Persisted<E>, DomainError> {
        let filter = Filter::by_id_str(id)?;
        let document = self
            .store
            .get_one(E::COLLECTION, &filter)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        E::from_document(&document)
    }

    /// Validates an entity and overwrites the stored one with its fields.
    pub async fn replace(&self, id: &str, entity: &E) -> Result<(), DomainError> {
        entity.validate()?;
        let filter = Filter::by_id_str(id)?;
        let modified = self
            .store
            .update(E::COLLECTION, &filter, entity.to_fields()?)
            .await?;
        if modified == 0 {
            return Err(self.not_found(id));
        }
        Ok(())
    }

    /// Removes an entity by its external identifier.
    pub async fn remove(&self, id: &str) -> Result<(), DomainError> {
        let filter = Filter::by_id_str(id)?;
        let deleted = self.store.delete(E::COLLECTION, &filter).await?;
        if deleted == 0 {
            return Err(self.not_found(id));
        }
        metrics::counter!("documents_deleted_total", "collection" => E::COLLECTION).increment(1);
        Ok(())
    }

    fn not_found(&self, id: &str) -> DomainError {
        DomainError::NotFound {
            collection: E::COLLECTION,
            id: id.to_string(),
        }
    }
}
