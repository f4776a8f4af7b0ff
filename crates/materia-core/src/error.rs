//! # Error Types
//!
//! Domain-level validation errors for materia-core.
//!
//! ## Error Hierarchy
//! ```text
//! materia-core errors (this file)
//! └── ValidationError  - input rule failures, no mutation attempted
//!
//! materia-db errors (separate crate)
//! └── DbError          - storage failures, stock conflicts, constraints
//!
//! API errors (apps/server)
//! └── ApiError         - what the HTTP caller sees (status + message)
//!
//! Flow: ValidationError → ApiError (400), DbError → ApiError (404/409/422/500)
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// These occur before any storage work starts; an operation that fails
/// validation has attempted no mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must not be empty is empty.
    #[error("{field} must contain at least one entry")]
    Empty { field: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Empty {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one entry");

        let err = ValidationError::MustBePositive {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must be positive");
    }
}
