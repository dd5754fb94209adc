//! Cart service: the session-scoped upsert-merge.

use document_store::{DocumentId, DocumentStore, Fields, Filter, decode, encode};
use validator::Validate;

use crate::entity::Entity;
use crate::error::DomainError;

use super::{Cart, CartItem};

/// Result of adding an item to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddItemOutcome {
    /// The session had no cart; one was created with this ID.
    Created(DocumentId),
    /// The item was merged into the existing cart.
    Added,
}

/// Service for managing session carts.
///
/// A cart is found through its `session_id` field, never through the
/// storage identifier.
pub struct CartService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CartService<S> {
    /// Creates a new cart service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Adds an item to the session's cart, creating the cart if needed.
    ///
    /// The lookup, merge and write run as one atomic store upsert, so
    /// concurrent calls for the same session never lose an increment and
    /// never create a second cart.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        session_id: &str,
        item: CartItem,
    ) -> Result<AddItemOutcome, DomainError> {
        item.validate()?;

        let session = session_id.to_string();
        let outcome = self
            .store
            .upsert_with(
                Cart::COLLECTION,
                &session_filter(session_id),
                Box::new(move |existing: Option<Fields>| -> document_store::Result<Fields> {
                    let mut cart = match existing {
                        Some(fields) => decode::<Cart>(fields)?,
                        None => Cart::empty(session),
                    };
                    cart.merge_item(item);
                    encode(&cart)
                }),
            )
            .await?;

        metrics::counter!("cart_items_added_total").increment(1);

        if outcome.is_created() {
            metrics::counter!("carts_created_total").increment(1);
            tracing::info!(id = %outcome.id(), "cart created");
            Ok(AddItemOutcome::Created(outcome.id()))
        } else {
            Ok(AddItemOutcome::Added)
        }
    }

    /// Returns the session's cart.
    ///
    /// A session without a stored cart gets an empty one; nothing is
    /// persisted in that case.
    #[tracing::instrument(skip(self))]
    pub async fn get_cart(&self, session_id: &str) -> Result<Cart, DomainError> {
        let document = self
            .store
            .get_one(Cart::COLLECTION, &session_filter(session_id))
            .await?;

        match document {
            Some(document) => Ok(Cart::from_document(&document)?.entity),
            None => Ok(Cart::empty(session_id)),
        }
    }
}

fn session_filter(session_id: &str) -> Filter {
    Filter::by_field("session_id", session_id)
}
