//! # Domain Types
//!
//! Core domain types used throughout Materia.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Customer ──owns──► Order ──owns──► OrderItem ──refers──► Product       │
//! │                       │                                                 │
//! │                       └──owns──► Payment                                │
//! │                                                                         │
//! │  PaymentStatus { Paid, Unpaid, Partial }  derived from the ledger       │
//! │  PaymentMethod { Cash, BankTransfer, Cheque, Upi, Other }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ownership rules: deleting a customer cascades to its orders; deleting an
//! order cascades to its items and payments and restores stock. Products are
//! referenced by items, never owned by them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer of the shop. Pure data, no derived logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,

    /// Per-unit price in cents. Snapshotted onto order items at order time;
    /// later price edits never touch existing orders.
    pub price_cents: i64,

    /// Current stock level. Never negative; the database enforces it and the
    /// decrement primitive refuses to go below zero.
    pub stock_quantity: i64,

    /// Unit of sale ("piece", "bag", "ton", ...).
    pub unit: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the current stock covers a requested quantity.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Aggregate payment state of an order.
///
/// Stored and serialized with capitalized names ('Paid', 'Unpaid', 'Partial')
/// to match the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Partial,
}

impl PaymentStatus {
    /// Derives the status from the ledger: cumulative paid vs order total.
    ///
    /// Over-payment clamps at Paid; there is no upper bound on the ledger.
    pub fn from_ledger(total_paid: Money, total: Money) -> Self {
        if total_paid >= total {
            PaymentStatus::Paid
        } else if total_paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }

    /// Whether this status implies money has been received.
    #[inline]
    pub fn is_paying(&self) -> bool {
        matches!(self, PaymentStatus::Paid | PaymentStatus::Partial)
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Unpaid
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
    Upi,
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order placed by a customer.
///
/// `total_amount_cents` is computed once at creation from the item snapshots
/// and never recomputed on later edits; items are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub total_amount_cents: i64,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
/// Uses the snapshot pattern: the product price is frozen at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Quantity ordered. Always positive.
    pub quantity: i64,
    /// Unit price in cents at order time (frozen).
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the snapshot unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Line total = quantity × snapshot price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment towards an order. Append-only: payments are inserted, never
/// edited. The sum of an order's payments determines its payment status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub payment_date: NaiveDate,
    /// Amount paid in cents. Always positive.
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_ledger() {
        let total = Money::from_cents(4000);

        assert_eq!(
            PaymentStatus::from_ledger(Money::zero(), total),
            PaymentStatus::Unpaid
        );
        assert_eq!(
            PaymentStatus::from_ledger(Money::from_cents(1000), total),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::from_ledger(Money::from_cents(4000), total),
            PaymentStatus::Paid
        );
        // over-payment clamps at Paid
        assert_eq!(
            PaymentStatus::from_ledger(Money::from_cents(9000), total),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn test_status_serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Partial).unwrap(),
            "\"Partial\""
        );
        let parsed: PaymentStatus = serde_json::from_str("\"Unpaid\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_method_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: "i".to_string(),
            order_id: "o".to_string(),
            product_id: "p".to_string(),
            quantity: 4,
            price_cents: 1250,
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total().cents(), 5000);
    }

    #[test]
    fn test_can_fulfill() {
        let product = Product {
            id: "p".to_string(),
            name: "Cement 50kg".to_string(),
            price_cents: 65000,
            stock_quantity: 10,
            unit: "bag".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.can_fulfill(10));
        assert!(!product.can_fulfill(11));
    }
}
