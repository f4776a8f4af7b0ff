//! SQLite persistence layer for Materia.
//!
//! Everything that touches the database lives here. The repositories own the
//! SQL; the workflow rules that must hold across tables (stock conservation,
//! payment-status synthesis, cascading deletes) run inside explicit
//! transactions so a failure never leaves the books half-written.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::customer::CustomerRepository;
pub use repository::order::{
    CreateOrderRequest, DeleteOrderOutcome, OrderDetails, OrderItemDetails, OrderItemRequest,
    OrderRepository, UpdateOrderRequest,
};
pub use repository::payment::{PaymentDetails, PaymentRepository, RecordPaymentRequest};
pub use repository::product::ProductRepository;
pub use repository::report::{
    DashboardSummary, PendingDelivery, ReportRepository, SalesReportRow,
};
pub use repository::generate_id;
