//! Session-keyed shopping cart.

mod service;

pub use service::{AddItemOutcome, CartService};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::Entity;

/// A line item: a product reference and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CartItem {
    pub product_id: String,

    #[validate(range(min = 1))]
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// The cart of one session.
///
/// `items` holds at most one entry per product. That invariant is kept by
/// [`Cart::merge_item`], not by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Cart {
    pub session_id: String,

    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates a cart with no items.
    pub fn empty(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            items: Vec::new(),
        }
    }

    /// Adds an item, incrementing the quantity if the product is already
    /// in the cart.
    ///
    /// Quantities are not capped by stock.
    pub fn merge_item(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
    }

    /// Returns the quantity of a product in the cart.
    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    /// Returns true if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Entity for Cart {
    const COLLECTION: &'static str = "cart";
}
