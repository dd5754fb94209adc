//! Product catalogue entity.

mod service;

pub use service::ProductService;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{Entity, Persisted};

/// A product as submitted by clients and stored in the `product` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

/// A product with its identifier and timestamps.
pub type ProductOut = Persisted<Product>;

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Creates an in-stock product with an empty description.
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            image: None,
            category: None,
            in_stock: true,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

impl Entity for Product {
    const COLLECTION: &'static str = "product";
}
