//! Payment repository.

use chrono::{NaiveDate, Utc};
use materia_core::{validation, Money, Payment, PaymentMethod, PaymentStatus};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;

/// Input for recording money received against an order.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub order_id: String,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub amount_cents: i64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A payment joined with its order's customer, for the ledger listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentDetails {
    pub id: String,
    pub order_id: String,
    pub customer_name: String,
    pub payment_date: NaiveDate,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a payment and re-derive the order's status from the full
    /// ledger, in one transaction. Returns the payment row and the status
    /// the order landed on.
    pub async fn record(&self, req: RecordPaymentRequest) -> DbResult<(Payment, PaymentStatus)> {
        validation::validate_payment_amount(req.amount_cents)?;

        let mut tx = self.pool.begin().await?;

        let total_cents: i64 =
            sqlx::query_scalar("SELECT total_amount_cents FROM orders WHERE id = ?1")
                .bind(&req.order_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| DbError::not_found("Order", &req.order_id))?;

        let payment = Payment {
            id: generate_id(),
            order_id: req.order_id.clone(),
            payment_date: req.payment_date.unwrap_or_else(|| Utc::now().date_naive()),
            amount_cents: req.amount_cents,
            payment_method: req.payment_method.unwrap_or_default(),
            notes: req.notes,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO payments (id, order_id, payment_date, amount_cents, payment_method, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&payment.id)
        .bind(&payment.order_id)
        .bind(payment.payment_date)
        .bind(payment.amount_cents)
        .bind(payment.payment_method)
        .bind(&payment.notes)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        let total_paid: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE order_id = ?1",
        )
        .bind(&req.order_id)
        .fetch_one(&mut *tx)
        .await?;

        let status =
            PaymentStatus::from_ledger(Money::from_cents(total_paid), Money::from_cents(total_cents));
        sqlx::query("UPDATE orders SET payment_status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(&req.order_id)
            .bind(status)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            order_id = %payment.order_id,
            amount_cents = payment.amount_cents,
            status = ?status,
            "payment recorded"
        );
        Ok((payment, status))
    }

    /// Payments for one order, oldest first.
    pub async fn for_order(&self, order_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, order_id, payment_date, amount_cents, payment_method, notes, created_at
             FROM payments WHERE order_id = ?1
             ORDER BY payment_date, created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    /// Full ledger with customer names, newest first.
    pub async fn list_with_details(&self) -> DbResult<Vec<PaymentDetails>> {
        let payments = sqlx::query_as::<_, PaymentDetails>(
            "SELECT p.id, p.order_id, c.name AS customer_name, p.payment_date,
                    p.amount_cents, p.payment_method, p.notes
             FROM payments p
             JOIN orders o ON o.id = p.order_id
             JOIN customers c ON c.id = o.customer_id
             ORDER BY p.payment_date DESC, p.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
