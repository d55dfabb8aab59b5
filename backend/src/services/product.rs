//! Product service for catalog operations

use crate::error::ApiError;
use crate::repositories::{product::Page, ProductRepository};
use product_api_shared::validation::resolve_pagination;
use product_api_shared::{Identifier, ListQuery, Product, ProductRequest};
use sqlx::SqlitePool;
use tracing::info;

/// Product service for business logic
pub struct ProductService;

impl ProductService {
    /// Create a product on behalf of `actor`
    pub async fn create(
        pool: &SqlitePool,
        actor: Identifier,
        req: ProductRequest,
    ) -> Result<Product, ApiError> {
        let product = Product::new(req.name.trim(), req.price)?;
        ProductRepository::create(pool, &product)
            .await
            .map_err(ApiError::Internal)?;

        info!(product_id = %product.id, actor = %actor, "Product created");
        Ok(product)
    }

    /// Get a product by id
    pub async fn get(pool: &SqlitePool, id: Identifier) -> Result<Product, ApiError> {
        ProductRepository::find_by_id(pool, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    /// List products, optionally paginated
    pub async fn list(pool: &SqlitePool, query: ListQuery) -> Result<Vec<Product>, ApiError> {
        let page = resolve_pagination(query.page, query.limit)
            .map_err(ApiError::Validation)?
            .map(|(page, limit)| Page { page, limit });

        ProductRepository::find_all(pool, page, query.sort)
            .await
            .map_err(ApiError::Internal)
    }

    /// Replace name and price of an existing product
    pub async fn update(
        pool: &SqlitePool,
        actor: Identifier,
        id: Identifier,
        req: ProductRequest,
    ) -> Result<Product, ApiError> {
        let existing = Self::get(pool, id).await?;

        let product = Product {
            name: req.name.trim().to_string(),
            price: req.price,
            ..existing
        };
        product.validate()?;

        if !ProductRepository::update(pool, &product)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        info!(product_id = %product.id, actor = %actor, "Product updated");
        Ok(product)
    }

    /// Delete a product
    pub async fn delete(pool: &SqlitePool, actor: Identifier, id: Identifier) -> Result<(), ApiError> {
        if !ProductRepository::delete(pool, id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }

        info!(product_id = %id, actor = %actor, "Product deleted");
        Ok(())
    }
}
