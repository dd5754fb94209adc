//! HTTP route handlers.

pub mod cart;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use document_store::DocumentStore;
use domain::{CartService, OrderService, ProductService};
use serde::{Deserialize, Serialize};

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore> {
    pub products: ProductService<S>,
    pub carts: CartService<S>,
    pub orders: OrderService<S>,
}

impl<S: DocumentStore + Clone> AppState<S> {
    /// Builds every service over the same store handle.
    pub fn new(store: S) -> Self {
        Self {
            products: ProductService::new(store.clone()),
            carts: CartService::new(store.clone()),
            orders: OrderService::new(store),
        }
    }
}

/// Single-message response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
