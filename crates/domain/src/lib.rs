//! Domain layer for the storefront backend.
//!
//! This crate provides:
//! - Entity schemas for products, carts and orders, with validation
//! - The `Entity` mapping between typed structs and store documents
//! - Services for each collection, including the cart merge logic

pub mod cart;
pub mod entity;
pub mod error;
pub mod order;
pub mod product;

pub use cart::{AddItemOutcome, Cart, CartItem, CartService};
pub use entity::{Entity, LIST_LIMIT, Persisted, Repository};
pub use error::DomainError;
pub use order::{Order, OrderItem, OrderOut, OrderService};
pub use product::{Product, ProductOut, ProductService};
