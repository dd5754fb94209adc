//! Product service.

use document_store::{DocumentId, DocumentStore, Filter};

use crate::entity::{LIST_LIMIT, Repository};
use crate::error::DomainError;

use super::{Product, ProductOut};

/// Service for managing the product catalogue.
pub struct ProductService<S: DocumentStore> {
    repository: Repository<S, Product>,
}

impl<S: DocumentStore> ProductService<S> {
    /// Creates a new product service with the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Validates and stores a new product.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, product: Product) -> Result<DocumentId, DomainError> {
        let id = self.repository.insert(&product).await?;
        tracing::info!(%id, "product created");
        Ok(id)
    }

    /// Lists up to `LIST_LIMIT` products.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductOut>, DomainError> {
        self.repository.list(&Filter::all(), LIST_LIMIT).await
    }

    /// Loads a product by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<ProductOut, DomainError> {
        self.repository.find(id).await
    }

    /// Overwrites a product's fields.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, id: &str, product: Product) -> Result<(), DomainError> {
        self.repository.replace(id, &product).await
    }

    /// Deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> Result<(), DomainError> {
        self.repository.remove(id).await?;
        tracing::info!(id, "product deleted");
        Ok(())
    }
}
