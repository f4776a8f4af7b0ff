//! Customer repository.

use materia_core::Customer;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO customers (id, name, phone, address, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;
        debug!(customer_id = %customer.id, "customer created");
        Ok(())
    }

    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, created_at, updated_at
             FROM customers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, created_at, updated_at
             FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Case-insensitive substring match on name, phone, or address.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Customer>> {
        let pattern = format!("%{query}%");
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, address, created_at, updated_at
             FROM customers
             WHERE name LIKE ?1 OR phone LIKE ?1 OR address LIKE ?1
             ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(customers)
    }

    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET name = ?2, phone = ?3, address = ?4, updated_at = ?5
             WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }
        Ok(())
    }

    /// Number of orders that would be deleted alongside this customer.
    pub async fn order_count(&self, id: &str) -> DbResult<i64> {
        // Confirm the customer exists so a bogus id is a 404, not a zero.
        self.get_by_id(id).await?;
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Delete the customer and every order under them, payments and line
    /// items included. Stock is NOT restored: the goods left the yard when
    /// the orders were placed, deleting the paperwork does not bring them
    /// back.
    pub async fn delete(&self, id: &str) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        sqlx::query(
            "DELETE FROM payments WHERE order_id IN
             (SELECT id FROM orders WHERE customer_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM order_items WHERE order_id IN
             (SELECT id FROM orders WHERE customer_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let orders_deleted = sqlx::query("DELETE FROM orders WHERE customer_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(customer_id = %id, orders_deleted, "customer deleted");
        Ok(orders_deleted as i64)
    }
}
