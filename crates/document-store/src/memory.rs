use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    Document, DocumentId, Fields, Filter, Result,
    store::{DocumentStore, Mutation, UpsertOutcome},
};

/// In-memory document store.
///
/// Each collection is a vector kept in insertion order. Every operation
/// takes the lock once, which gives the same per-document atomicity the
/// PostgreSQL implementation provides.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, data: Fields) -> Result<DocumentId> {
        let document = Document::new(data, Utc::now());
        let id = document.id;

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        tracing::debug!(collection, %id, "document created");
        Ok(id)
    }

    async fn update(&self, collection: &str, filter: &Filter, data: Fields) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match documents.iter_mut().find(|d| filter.matches(d)) {
            Some(document) => {
                document.merge(data, Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list(
        &self,
        collection: &str,
        filter: &Filter,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(d))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn get_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn delete(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match documents.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                let removed = documents.remove(index);
                tracing::debug!(collection, id = %removed.id, "document deleted");
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn upsert_with(
        &self,
        collection: &str,
        filter: &Filter,
        mutation: Mutation,
    ) -> Result<UpsertOutcome> {
        // The write lock is held across read and write.
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        let now = Utc::now();

        match documents.iter_mut().find(|d| filter.matches(d)) {
            Some(document) => {
                let fields = mutation(Some(document.fields.clone()))?;
                document.replace(fields, now);
                Ok(UpsertOutcome::Updated(document.id))
            }
            None => {
                let document = Document::new(mutation(None)?, now);
                let id = document.id;
                documents.push(document);
                Ok(UpsertOutcome::Created(id))
            }
        }
    }
}
