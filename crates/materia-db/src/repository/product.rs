//! Product repository.

use chrono::Utc;
use materia_core::Product;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO products (id, name, price_cents, stock_quantity, unit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.unit)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        debug!(product_id = %product.id, "product created");
        Ok(())
    }

    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock_quantity, unit, created_at, updated_at
             FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock_quantity, unit, created_at, updated_at
             FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        let pattern = format!("%{query}%");
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock_quantity, unit, created_at, updated_at
             FROM products WHERE name LIKE ?1 ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products
             SET name = ?2, price_cents = ?3, stock_quantity = ?4, unit = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(&product.unit)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }
        Ok(())
    }

    /// Adjust stock by a signed delta. The guard lives in the WHERE clause,
    /// so two concurrent adjustments can never drive stock below zero.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<Product> {
        let result = sqlx::query(
            "UPDATE products
             SET stock_quantity = stock_quantity + ?2, updated_at = ?3
             WHERE id = ?1 AND stock_quantity + ?2 >= 0",
        )
        .bind(id)
        .bind(delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let product = self.get_by_id(id).await?;
            return Err(DbError::InsufficientStock {
                product: product.name,
                available: product.stock_quantity,
                requested: -delta,
            });
        }
        self.get_by_id(id).await
    }

    /// Number of order line items referencing this product.
    pub async fn order_item_count(&self, id: &str) -> DbResult<i64> {
        self.get_by_id(id).await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Delete the product and every line item referencing it. Orders keep
    /// their stored totals; the line items simply disappear from them.
    pub async fn delete(&self, id: &str) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let items_removed = sqlx::query("DELETE FROM order_items WHERE product_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        tx.commit().await?;
        debug!(product_id = %id, items_removed, "product deleted");
        Ok(items_removed as i64)
    }
}
