//! Order endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use materia_db::{CreateOrderRequest, OrderDetails, UpdateOrderRequest};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<OrderDetails>>> {
    Ok(Json(state.db.orders().list_with_details().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let order = state.db.orders().create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "id": order.id,
            "total_amount_cents": order.total_amount_cents,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> ApiResult<Json<Value>> {
    let order = state.db.orders().update(&id, req).await?;
    Ok(Json(json!({
        "message": "Order updated successfully",
        "payment_status": order.payment_status,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let outcome = state.db.orders().delete(&id).await?;
    Ok(Json(json!({
        "message": format!(
            "Order deleted successfully. {} payment(s) removed, stock restored for {} product(s)",
            outcome.payments_deleted, outcome.products_restocked
        ),
        "payments_deleted": outcome.payments_deleted,
        "products_restocked": outcome.products_restocked,
    })))
}
