//! Database error types.

use materia_core::ValidationError;
use thiserror::Error;

/// Errors produced by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The requested row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A stock decrement would drive a product below zero.
    #[error("insufficient stock for {product}: {available} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// A UNIQUE constraint rejected the write.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A FOREIGN KEY constraint rejected the write.
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Input failed domain validation before reaching SQL.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("migration failed: {0}")]
    MigrationFailed(String),

    #[error("query failed: {0}")]
    QueryFailed(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// True when the error is the caller's fault rather than the database's.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::UniqueViolation(_)
                | Self::ForeignKeyViolation(_)
                | Self::Validation(_)
        )
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "row",
                id: String::new(),
            },
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                if message.contains("UNIQUE constraint failed") {
                    DbError::UniqueViolation(message)
                } else if message.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation(message)
                } else {
                    DbError::QueryFailed(message)
                }
            }
            _ => DbError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = DbError::not_found("Order", "abc-123");
        assert_eq!(err.to_string(), "Order not found: abc-123");
        assert!(err.is_client_error());
    }

    #[test]
    fn insufficient_stock_is_client_error() {
        let err = DbError::InsufficientStock {
            product: "Cement 50kg".into(),
            available: 3,
            requested: 10,
        };
        assert!(err.is_client_error());
        assert!(err.to_string().contains("3 available"));
    }

    #[test]
    fn query_failures_are_not_client_errors() {
        assert!(!DbError::QueryFailed("disk I/O error".into()).is_client_error());
    }
}
