//! Route table.

pub mod customers;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reports;

use axum::extract::State;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/customers",
            get(customers::list).post(customers::create),
        )
        .route(
            "/api/customers/{id}",
            put(customers::update).delete(customers::delete),
        )
        .route(
            "/api/customers/{id}/check-orders",
            get(customers::check_orders),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route(
            "/api/products/{id}/check-orders",
            get(products::check_orders),
        )
        .route("/api/orders", get(orders::list).post(orders::create))
        .route(
            "/api/orders/{id}",
            put(orders::update).delete(orders::delete),
        )
        .route("/api/payments", get(payments::list).post(payments::create))
        .route("/api/reports/sales", get(reports::sales))
        .route("/api/reports/low-stock", get(reports::low_stock))
        .route("/api/dashboard", get(reports::dashboard))
        .route(
            "/api/dashboard/pending-deliveries",
            get(reports::pending_deliveries),
        )
        .route("/api/search", get(reports::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    state.db.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}
