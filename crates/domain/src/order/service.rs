//! Order service.

use document_store::{DocumentId, DocumentStore, Filter};

use crate::entity::{LIST_LIMIT, Repository};
use crate::error::DomainError;

use super::{Order, OrderOut};

/// Service for placing and listing orders.
///
/// Orders are immutable once created.
pub struct OrderService<S: DocumentStore> {
    repository: Repository<S, Order>,
}

impl<S: DocumentStore> OrderService<S> {
    /// Creates a new order service with the given store.
    pub fn new(store: S) -> Self {
        Self {
            repository: Repository::new(store),
        }
    }

    /// Validates and stores a new order.
    #[tracing::instrument(skip(self, order), fields(session_id = %order.session_id))]
    pub async fn create_order(&self, order: Order) -> Result<DocumentId, DomainError> {
        let id = self.repository.insert(&order).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(%id, items = order.items.len(), "order created");
        Ok(id)
    }

    /// Lists up to `LIST_LIMIT` orders.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderOut>, DomainError> {
        self.repository.list(&Filter::all(), LIST_LIMIT).await
    }
}
