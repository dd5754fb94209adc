//! Order entity.

mod service;

pub use service::OrderService;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, Persisted};

/// Status given to orders that do not specify one.
pub const DEFAULT_STATUS: &str = "pending";

/// A line of an order.
///
/// `price_each` is the unit price captured when the order was placed, so
/// later product price changes do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OrderItem {
    pub product_id: String,

    #[validate(range(min = 1))]
    pub quantity: u32,

    #[validate(range(min = 0.0))]
    pub price_each: f64,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_id: impl Into<String>, quantity: u32, price_each: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            price_each,
        }
    }
}

/// An order placed by a session.
///
/// `total` is taken as given; it is not checked against the items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    pub session_id: String,

    #[validate(nested)]
    pub items: Vec<OrderItem>,

    #[validate(range(min = 0.0))]
    pub total: f64,

    #[serde(default = "default_status")]
    pub status: String,
}

/// An order with its identifier and timestamps.
pub type OrderOut = Persisted<Order>;

fn default_status() -> String {
    DEFAULT_STATUS.to_string()
}

impl Order {
    /// Creates a pending order.
    pub fn new(session_id: impl Into<String>, items: Vec<OrderItem>, total: f64) -> Self {
        Self {
            session_id: session_id.into(),
            items,
            total,
            status: default_status(),
        }
    }
}

impl Entity for Order {
    const COLLECTION: &'static str = "order";
}
