//! Domain models for the Product API

use crate::errors::ProductError;
use crate::id::Identifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Identifier,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Identifier,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a new product with a fresh identifier
    pub fn new(name: impl Into<String>, price: f64) -> Result<Self, ProductError> {
        let product = Self {
            id: Identifier::generate(),
            name: name.into(),
            price,
            created_at: Utc::now(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Check the product invariants
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.id.is_nil() {
            return Err(ProductError::IdRequired);
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::NameRequired);
        }
        if self.price == 0.0 {
            return Err(ProductError::PriceRequired);
        }
        if self.price < 0.0 || !self.price.is_finite() {
            return Err(ProductError::InvalidPrice);
        }
        Ok(())
    }
}
