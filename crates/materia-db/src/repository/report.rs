//! Read-only reporting projections.

use chrono::{Datelike, NaiveDate};
use materia_core::{PaymentStatus, Product};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::DbResult;

/// One sold line in a date range, for the sales report.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesReportRow {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub customer_name: String,
    /// Current product name; `None` when the product was deleted since.
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub line_total_cents: i64,
    pub payment_status: PaymentStatus,
}

/// An order due today or tomorrow.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PendingDelivery {
    pub order_id: String,
    pub customer_name: String,
    pub delivery_date: NaiveDate,
    pub delivery_address: Option<String>,
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    pub payment_status: PaymentStatus,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DashboardSummary {
    pub total_customers: i64,
    pub total_products: i64,
    /// Sum of order totals since the first of the current month.
    pub monthly_sales_cents: i64,
    /// Unpaid remainder across all non-Paid orders.
    pub outstanding_cents: i64,
    pub orders_today: i64,
}

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One row per order line whose order falls in `[start, end]`.
    pub async fn sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<SalesReportRow>> {
        let rows = sqlx::query_as::<_, SalesReportRow>(
            "SELECT o.id AS order_id, o.order_date, c.name AS customer_name,
                    p.name AS product_name, i.quantity, i.price_cents,
                    i.quantity * i.price_cents AS line_total_cents,
                    o.payment_status
             FROM order_items i
             JOIN orders o ON o.id = i.order_id
             JOIN customers c ON c.id = o.customer_id
             LEFT JOIN products p ON p.id = i.product_id
             WHERE o.order_date BETWEEN ?1 AND ?2
             ORDER BY o.order_date, o.id, i.created_at",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Products running low, emptiest shelf first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock_quantity, unit, created_at, updated_at
             FROM products WHERE stock_quantity < ?1
             ORDER BY stock_quantity, name",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Orders due today or tomorrow.
    pub async fn pending_deliveries(&self, today: NaiveDate) -> DbResult<Vec<PendingDelivery>> {
        let tomorrow = today.succ_opt().unwrap_or(today);
        let rows = sqlx::query_as::<_, PendingDelivery>(
            "SELECT o.id AS order_id, c.name AS customer_name, o.delivery_date,
                    o.delivery_address, o.total_amount_cents,
                    COALESCE((SELECT SUM(p.amount_cents) FROM payments p
                              WHERE p.order_id = o.id), 0) AS amount_paid_cents,
                    o.payment_status
             FROM orders o
             JOIN customers c ON c.id = o.customer_id
             WHERE o.delivery_date IN (?1, ?2)
             ORDER BY o.delivery_date, o.id",
        )
        .bind(today)
        .bind(tomorrow)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard(&self, today: NaiveDate) -> DbResult<DashboardSummary> {
        let month_start = today.with_day(1).unwrap_or(today);
        let summary = sqlx::query_as::<_, DashboardSummary>(
            "SELECT
                (SELECT COUNT(*) FROM customers) AS total_customers,
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COALESCE(SUM(total_amount_cents), 0) FROM orders
                 WHERE order_date >= ?1) AS monthly_sales_cents,
                (SELECT COALESCE(SUM(MAX(o.total_amount_cents - COALESCE(
                     (SELECT SUM(p.amount_cents) FROM payments p
                      WHERE p.order_id = o.id), 0), 0)), 0)
                 FROM orders o
                 WHERE o.payment_status != 'Paid') AS outstanding_cents,
                (SELECT COUNT(*) FROM orders WHERE order_date = ?2) AS orders_today",
        )
        .bind(month_start)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
