//! Product repository for database operations

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use product_api_shared::{Identifier, Product, SortOrder};
use sqlx::SqlitePool;

/// Product record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = anyhow::Error;

    fn try_from(record: ProductRecord) -> Result<Self> {
        let id = Identifier::parse(&record.id)
            .with_context(|| format!("Corrupt product id in database: {:?}", record.id))?;
        Ok(Product {
            id,
            name: record.name,
            price: record.price,
            created_at: record.created_at,
        })
    }
}

/// A page of the product listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// Product repository for database operations
pub struct ProductRepository;

impl ProductRepository {
    /// Insert a new product
    pub async fn create(pool: &SqlitePool, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(product.id.to_string())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Find product by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Identifier) -> Result<Option<Product>> {
        let record = sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT id, name, price, created_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

        record.map(Product::try_from).transpose()
    }

    /// List products ordered by creation time
    ///
    /// Without a page the whole table is returned.
    pub async fn find_all(
        pool: &SqlitePool,
        page: Option<Page>,
        sort: SortOrder,
    ) -> Result<Vec<Product>> {
        let order = sort.as_sql();
        let records = match page {
            Some(page) => {
                let sql = format!(
                    "SELECT id, name, price, created_at FROM products \
                     ORDER BY created_at {order}, rowid {order} LIMIT ? OFFSET ?"
                );
                sqlx::query_as::<_, ProductRecord>(&sql)
                    .bind(i64::from(page.limit))
                    .bind(page.offset())
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT id, name, price, created_at FROM products \
                     ORDER BY created_at {order}, rowid {order}"
                );
                sqlx::query_as::<_, ProductRecord>(&sql)
                    .fetch_all(pool)
                    .await?
            }
        };

        records.into_iter().map(Product::try_from).collect()
    }

    /// Update name and price; returns false when the product does not exist
    pub async fn update(pool: &SqlitePool, product: &Product) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products SET name = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.id.to_string())
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product; returns false when the product does not exist
    pub async fn delete(pool: &SqlitePool, id: Identifier) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.to_string())
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Duration;

    async fn test_pool() -> SqlitePool {
        let pool = db::create_memory_pool().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    /// Products 1..=n created one second apart
    async fn seed(pool: &SqlitePool, n: u32) -> Vec<Product> {
        let start = Utc::now();
        let mut products = Vec::new();
        for i in 1..=n {
            let mut product = Product::new(format!("Product {}", i), f64::from(i) * 1.5).unwrap();
            product.created_at = start + Duration::seconds(i64::from(i));
            ProductRepository::create(pool, &product).await.unwrap();
            products.push(product);
        }
        products
    }

    #[tokio::test]
    async fn test_create_and_find_product() {
        let pool = test_pool().await;
        let product = Product::new("Product 1", 10.0).unwrap();
        ProductRepository::create(&pool, &product).await.unwrap();

        let found = ProductRepository::find_by_id(&pool, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Product 1");
        assert_eq!(found.price, 10.0);
        assert_eq!(found.created_at.timestamp(), product.created_at.timestamp());
    }

    #[tokio::test]
    async fn test_find_all_paginated() {
        let pool = test_pool().await;
        seed(&pool, 23).await;

        let page = Some(Page { page: 1, limit: 10 });
        let products = ProductRepository::find_all(&pool, page, SortOrder::Asc)
            .await
            .unwrap();
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].name, "Product 1");
        assert_eq!(products[9].name, "Product 10");

        let page = Some(Page { page: 3, limit: 10 });
        let products = ProductRepository::find_all(&pool, page, SortOrder::Asc)
            .await
            .unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[2].name, "Product 23");
    }

    #[tokio::test]
    async fn test_find_all_descending_unpaged() {
        let pool = test_pool().await;
        seed(&pool, 5).await;

        let products = ProductRepository::find_all(&pool, None, SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Product 5");
        assert_eq!(products[4].name, "Product 1");
    }

    #[tokio::test]
    async fn test_update_product() {
        let pool = test_pool().await;
        let mut product = Product::new("Product 1", 10.0).unwrap();
        ProductRepository::create(&pool, &product).await.unwrap();

        product.name = "Product Updated to 2".to_string();
        assert!(ProductRepository::update(&pool, &product).await.unwrap());

        let found = ProductRepository::find_by_id(&pool, product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Product Updated to 2");

        let missing = Product::new("Ghost", 1.0).unwrap();
        assert!(!ProductRepository::update(&pool, &missing).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_product() {
        let pool = test_pool().await;
        let product = Product::new("Product to remove 1", 10.0).unwrap();
        ProductRepository::create(&pool, &product).await.unwrap();

        assert!(ProductRepository::delete(&pool, product.id).await.unwrap());
        assert!(ProductRepository::find_by_id(&pool, product.id)
            .await
            .unwrap()
            .is_none());
        assert!(!ProductRepository::delete(&pool, product.id).await.unwrap());
    }
}
