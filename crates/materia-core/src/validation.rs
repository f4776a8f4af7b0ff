//! # Validation Module
//!
//! Input validation rules for Materia.
//!
//! ## Validation Strategy
//! ```text
//! Layer 1: HTTP handler (Rust)
//! ├── Type validation (deserialization)
//! └── THIS MODULE: business rule validation
//!
//! Layer 2: Database (SQLite)
//! ├── NOT NULL constraints
//! ├── CHECK (stock_quantity >= 0)
//! └── Foreign key constraints
//!
//! Defense in depth: the layers catch different errors.
//! ```
//!
//! Every function here is pure; callers run them before opening a
//! transaction so a validation failure never touches storage.

use crate::error::{ValidationError, ValidationResult};
use crate::MAX_ITEM_QUANTITY;

/// Validates a customer or product display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates a customer phone number.
///
/// Kept permissive on purpose: the shop records landlines, mobiles and
/// WhatsApp numbers in whatever format the customer gives.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: 20,
        });
    }

    Ok(())
}

/// Validates a customer address.
pub fn validate_address(address: &str) -> ValidationResult<()> {
    if address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }

    Ok(())
}

/// Validates a product price in cents.
///
/// Zero is allowed (free samples, promo items); negative is not.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::MustBePositive {
            field: "price_cents".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial or edited stock quantity.
pub fn validate_stock_quantity(stock_quantity: i64) -> ValidationResult<()> {
    if stock_quantity < 0 {
        return Err(ValidationError::MustBePositive {
            field: "stock_quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a single order line quantity.
///
/// ## Rules
/// - Must be strictly positive
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the item list of an order-creation request.
///
/// The per-item product existence and stock checks happen inside the
/// order transaction; this only guards shape.
pub fn validate_order_items(quantities: &[i64]) -> ValidationResult<()> {
    if quantities.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for &quantity in quantities {
        validate_quantity(quantity)?;
    }

    Ok(())
}

/// Validates a payment amount in cents.
///
/// A payment row always represents money actually received, so the
/// amount must be strictly positive.
pub fn validate_payment_amount(amount_cents: i64) -> ValidationResult<()> {
    if amount_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount_cents".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Cement 50kg").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(65000).is_ok());
        assert!(validate_price_cents(-1).is_err());

        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_order_items() {
        assert!(validate_order_items(&[1, 5, 10]).is_ok());
        assert!(validate_order_items(&[]).is_err());
        assert!(validate_order_items(&[3, 0]).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(1).is_ok());
        assert!(validate_payment_amount(0).is_err());
        assert!(validate_payment_amount(-100).is_err());
    }
}
