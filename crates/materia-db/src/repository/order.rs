//! Order repository.
//!
//! Order creation, edit, and deletion are the three places where stock,
//! totals, and the payment ledger have to move together. Each runs in a
//! single transaction; on any error the transaction rolls back and no table
//! has changed.

use chrono::{NaiveDate, Utc};
use materia_core::{
    validation, Money, Order, OrderItem, PaymentMethod, PaymentStatus, Product,
};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;

/// One requested line of a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Input for order creation.
///
/// `payment_status` is what the clerk claims at the counter; when it claims
/// money changed hands (`Paid` or `Partial`) and an amount is supplied, a
/// matching payment row is seeded in the same transaction so the ledger
/// backs the claim. The declared status itself is trusted as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_amount_cents: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// Partial update of an order's editable fields. Line items are immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub payment_amount_cents: Option<i64>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// What an order deletion undid.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeleteOrderOutcome {
    pub payments_deleted: i64,
    /// Line items whose product still existed and got its stock back.
    pub products_restocked: i64,
}

/// A line item joined with its product's current name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItemDetails {
    pub id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub line_total_cents: i64,
}

/// An order joined with its customer, ledger sum, and line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub total_amount_cents: i64,
    pub amount_paid_cents: i64,
    pub outstanding_cents: i64,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderItemDetails>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderDetailsRow {
    id: String,
    customer_id: String,
    customer_name: String,
    order_date: NaiveDate,
    delivery_date: Option<NaiveDate>,
    delivery_address: Option<String>,
    total_amount_cents: i64,
    amount_paid_cents: i64,
    payment_status: PaymentStatus,
}

impl OrderDetailsRow {
    fn into_details(self, items: Vec<OrderItemDetails>) -> OrderDetails {
        let outstanding = Money::from_cents(self.total_amount_cents)
            .saturating_sub(Money::from_cents(self.amount_paid_cents));
        OrderDetails {
            id: self.id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            order_date: self.order_date,
            delivery_date: self.delivery_date,
            delivery_address: self.delivery_address,
            total_amount_cents: self.total_amount_cents,
            amount_paid_cents: self.amount_paid_cents,
            outstanding_cents: outstanding.cents(),
            payment_status: self.payment_status,
            items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an order: decrement stock for every line, snapshot unit prices,
    /// compute the total, and seed a payment when the requested status says
    /// money was taken. All or nothing.
    pub async fn create(&self, req: CreateOrderRequest) -> DbResult<Order> {
        let quantities: Vec<i64> = req.items.iter().map(|i| i.quantity).collect();
        validation::validate_order_items(&quantities)?;

        let mut tx = self.pool.begin().await?;

        let customer_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
                .bind(&req.customer_id)
                .fetch_one(&mut *tx)
                .await?;
        if customer_exists == 0 {
            return Err(DbError::not_found("Customer", &req.customer_id));
        }

        let now = Utc::now();
        let mut total = Money::zero();
        let mut lines: Vec<(String, i64, Money)> = Vec::with_capacity(req.items.len());
        for item in &req.items {
            let price = decrement_stock(&mut tx, &item.product_id, item.quantity).await?;
            total += price.multiply_quantity(item.quantity);
            lines.push((item.product_id.clone(), item.quantity, price));
        }

        let status = req.payment_status.unwrap_or_default();
        let order = Order {
            id: generate_id(),
            customer_id: req.customer_id,
            order_date: req.order_date,
            delivery_date: req.delivery_date,
            delivery_address: req.delivery_address,
            total_amount_cents: total.cents(),
            payment_status: status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO orders
             (id, customer_id, order_date, delivery_date, delivery_address,
              total_amount_cents, payment_status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(&order.delivery_address)
        .bind(order.total_amount_cents)
        .bind(order.payment_status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        for (product_id, quantity, price) in &lines {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, price_cents, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(generate_id())
            .bind(&order.id)
            .bind(product_id)
            .bind(quantity)
            .bind(price.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        // A payment is seeded only when an explicit positive amount came
        // with the paying status; a bare "Paid" claim gets no ledger row.
        if status.is_paying() {
            if let Some(cents) = req.payment_amount_cents.filter(|c| *c > 0) {
                let amount = Money::from_cents(cents);
                let note = match status {
                    PaymentStatus::Paid => {
                        format!("Full payment of {amount} recorded when order was created")
                    }
                    _ => {
                        let outstanding = total.saturating_sub(amount);
                        format!(
                            "Partial payment of {amount} recorded when order was created \
                             (Outstanding: {outstanding})"
                        )
                    }
                };
                insert_payment(
                    &mut tx,
                    &order.id,
                    req.order_date,
                    amount,
                    req.payment_method.unwrap_or_default(),
                    &note,
                )
                .await?;
            }
        }

        tx.commit().await?;
        info!(order_id = %order.id, total_cents = order.total_amount_cents, "order created");
        Ok(order)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, order_date, delivery_date, delivery_address,
                    total_amount_cents, payment_status, created_at, updated_at
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))
    }

    pub async fn items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price_cents, created_at
             FROM order_items WHERE order_id = ?1 ORDER BY created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// All orders with customer names, ledger sums, and line items, newest
    /// order date first.
    pub async fn list_with_details(&self) -> DbResult<Vec<OrderDetails>> {
        let rows = sqlx::query_as::<_, OrderDetailsRow>(
            "SELECT o.id, o.customer_id, c.name AS customer_name, o.order_date,
                    o.delivery_date, o.delivery_address, o.total_amount_cents,
                    COALESCE((SELECT SUM(p.amount_cents) FROM payments p
                              WHERE p.order_id = o.id), 0) AS amount_paid_cents,
                    o.payment_status
             FROM orders o
             JOIN customers c ON c.id = o.customer_id
             ORDER BY o.order_date DESC, o.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.item_details(&row.id).await?;
            details.push(row.into_details(items));
        }
        Ok(details)
    }

    pub async fn details(&self, id: &str) -> DbResult<OrderDetails> {
        let row = sqlx::query_as::<_, OrderDetailsRow>(
            "SELECT o.id, o.customer_id, c.name AS customer_name, o.order_date,
                    o.delivery_date, o.delivery_address, o.total_amount_cents,
                    COALESCE((SELECT SUM(p.amount_cents) FROM payments p
                              WHERE p.order_id = o.id), 0) AS amount_paid_cents,
                    o.payment_status
             FROM orders o
             JOIN customers c ON c.id = o.customer_id
             WHERE o.id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))?;

        let items = self.item_details(id).await?;
        Ok(row.into_details(items))
    }

    async fn item_details(&self, order_id: &str) -> DbResult<Vec<OrderItemDetails>> {
        let items = sqlx::query_as::<_, OrderItemDetails>(
            "SELECT i.id, i.product_id, p.name AS product_name, i.quantity,
                    i.price_cents, i.quantity * i.price_cents AS line_total_cents
             FROM order_items i
             LEFT JOIN products p ON p.id = i.product_id
             WHERE i.order_id = ?1
             ORDER BY i.created_at",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Edit dates, address, and payment status. The total and the line items
    /// never change here.
    ///
    /// When the status moves from `Unpaid` to a paying one and the order has
    /// no payments yet, a payment row is synthesized so the ledger matches
    /// the new status. This fires at most once per order; later status flips
    /// leave the ledger alone.
    pub async fn update(&self, id: &str, req: UpdateOrderRequest) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let mut order = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, order_date, delivery_date, delivery_address,
                    total_amount_cents, payment_status, created_at, updated_at
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))?;

        if let Some(date) = req.order_date {
            order.order_date = date;
        }
        if let Some(date) = req.delivery_date {
            order.delivery_date = Some(date);
        }
        if let Some(address) = req.delivery_address {
            order.delivery_address = Some(address);
        }

        if let Some(new_status) = req.payment_status {
            if new_status.is_paying() && !order.payment_status.is_paying() {
                let existing: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE order_id = ?1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if existing == 0 {
                    let total = order.total_amount();
                    let amount = synthesized_amount(new_status, total, req.payment_amount_cents);
                    if amount.is_positive() {
                        let note = match new_status {
                            PaymentStatus::Paid => format!(
                                "Full payment of {amount} recorded when order status \
                                 changed to Paid"
                            ),
                            _ => {
                                let outstanding = total.saturating_sub(amount);
                                format!(
                                    "Partial payment of {amount} recorded when order status \
                                     changed to Partial (Outstanding: {outstanding})"
                                )
                            }
                        };
                        insert_payment(
                            &mut tx,
                            id,
                            Utc::now().date_naive(),
                            amount,
                            req.payment_method.unwrap_or_default(),
                            &note,
                        )
                        .await?;
                    }
                }
            }
            order.payment_status = new_status;
        }

        order.updated_at = Utc::now();
        sqlx::query(
            "UPDATE orders
             SET order_date = ?2, delivery_date = ?3, delivery_address = ?4,
                 payment_status = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(&order.id)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(&order.delivery_address)
        .bind(order.payment_status)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(order_id = %id, "order updated");
        Ok(order)
    }

    /// Delete an order, returning its goods to stock. Payments and line
    /// items go with it. Stock only returns to products that still exist.
    pub async fn delete(&self, id: &str) -> DbResult<DeleteOrderOutcome> {
        let mut tx = self.pool.begin().await?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE id = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Order", id));
        }

        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT id, order_id, product_id, quantity, price_cents, created_at
             FROM order_items WHERE order_id = ?1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();
        let mut products_restocked = 0i64;
        for item in &items {
            let restored = sqlx::query(
                "UPDATE products
                 SET stock_quantity = stock_quantity + ?2, updated_at = ?3
                 WHERE id = ?1",
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            products_restocked += restored as i64;
        }

        let payments_deleted = sqlx::query("DELETE FROM payments WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(order_id = %id, payments_deleted, products_restocked, "order deleted");
        Ok(DeleteOrderOutcome {
            payments_deleted: payments_deleted as i64,
            products_restocked,
        })
    }
}

/// Take `quantity` units off a product's shelf, returning its unit price for
/// the line snapshot. The guard is the `stock_quantity >= ?` predicate, not
/// the earlier read, so concurrent orders cannot oversell.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: &str,
    quantity: i64,
) -> DbResult<Money> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT id, name, price_cents, stock_quantity, unit, created_at, updated_at
         FROM products WHERE id = ?1",
    )
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| DbError::not_found("Product", product_id))?;

    let result = sqlx::query(
        "UPDATE products
         SET stock_quantity = stock_quantity - ?2, updated_at = ?3
         WHERE id = ?1 AND stock_quantity >= ?2",
    )
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InsufficientStock {
            product: product.name,
            available: product.stock_quantity,
            requested: quantity,
        });
    }
    Ok(product.price())
}

/// Amount synthesized when a status edit claims money was received: full
/// total for `Paid`, the supplied amount for `Partial` when positive,
/// otherwise half the total.
fn synthesized_amount(status: PaymentStatus, total: Money, supplied_cents: Option<i64>) -> Money {
    match status {
        PaymentStatus::Paid => total,
        _ => match supplied_cents {
            Some(cents) if cents > 0 => Money::from_cents(cents),
            _ => total.half(),
        },
    }
}

async fn insert_payment(
    tx: &mut Transaction<'_, Sqlite>,
    order_id: &str,
    payment_date: NaiveDate,
    amount: Money,
    method: PaymentMethod,
    notes: &str,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO payments (id, order_id, payment_date, amount_cents, payment_method, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(generate_id())
    .bind(order_id)
    .bind(payment_date)
    .bind(amount.cents())
    .bind(method)
    .bind(notes)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}
