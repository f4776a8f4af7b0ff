//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use materia_core::ValidationError;
use materia_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Anything a handler can fail with. `IntoResponse` turns it into the
/// `{"error": ...}` body the API promises.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Db(DbError::Validation(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Db(err) => match err {
                DbError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                DbError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                DbError::InsufficientStock { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
                }
                DbError::UniqueViolation(_) | DbError::ForeignKeyViolation(_) => {
                    (StatusCode::CONFLICT, err.to_string())
                }
                // Storage faults are logged in full but answered opaquely.
                _ => {
                    error!(error = %err, "storage fault");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_maps_to_422() {
        let response = ApiError::Db(DbError::InsufficientStock {
            product: "Cement 50kg".into(),
            available: 1,
            requested: 2,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_faults_map_to_opaque_500() {
        let response = ApiError::Db(DbError::QueryFailed("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let response: Response = ApiError::from(ValidationError::Required {
            field: "name".to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
