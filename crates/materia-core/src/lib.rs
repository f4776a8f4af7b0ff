//! # materia-core: Pure Business Logic for Materia
//!
//! This crate is the heart of the Materia backend. It contains the domain
//! model and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Materia Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/server (axum JSON API)                    │   │
//! │  │    /api/customers  /api/products  /api/orders  /api/payments    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ materia-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   types (Customer, Product, Order, Payment)                     │   │
//! │  │   money (integer cents, no floats)                              │   │
//! │  │   validation (input rules)                                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  materia-db (Database Layer)                    │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic, same input = same output
//! 2. **No I/O**: database, network and file system access are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// Re-exports so users can do `use materia_core::Money` instead of
// `use materia_core::money::Money`
pub use error::ValidationError;
pub use money::Money;
pub use types::*;

/// Stock level below which a product shows up on the low-stock report.
///
/// The dashboard and the low-stock endpoint both use this unless the
/// deployment overrides it via configuration.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum quantity of a single product on one order line.
///
/// Guards against fat-finger entry (e.g. typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 9999;
