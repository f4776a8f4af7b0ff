//! Payment endpoints.

use axum::extract::State;
use axum::Json;
use materia_db::{PaymentDetails, RecordPaymentRequest};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PaymentDetails>>> {
    Ok(Json(state.db.payments().list_with_details().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<RecordPaymentRequest>,
) -> ApiResult<Json<Value>> {
    let (payment, status) = state.db.payments().record(req).await?;
    Ok(Json(json!({
        "message": "Payment recorded successfully",
        "id": payment.id,
        "payment_status": status,
    })))
}
