//! Product endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use materia_core::{validation, Product};
use materia_db::generate_id;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_name(&req.name)?;
    validation::validate_price_cents(req.price_cents)?;
    validation::validate_stock_quantity(req.stock_quantity)?;

    let now = Utc::now();
    let product = Product {
        id: generate_id(),
        name: req.name.trim().to_string(),
        price_cents: req.price_cents,
        stock_quantity: req.stock_quantity,
        unit: req.unit.unwrap_or_else(|| "piece".to_string()),
        created_at: now,
        updated_at: now,
    };
    state.db.products().insert(&product).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "id": product.id,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<Value>> {
    let mut product = state.db.products().get_by_id(&id).await?;

    if let Some(name) = req.name {
        validation::validate_name(&name)?;
        product.name = name.trim().to_string();
    }
    if let Some(price_cents) = req.price_cents {
        validation::validate_price_cents(price_cents)?;
        product.price_cents = price_cents;
    }
    if let Some(stock_quantity) = req.stock_quantity {
        validation::validate_stock_quantity(stock_quantity)?;
        product.stock_quantity = stock_quantity;
    }
    if let Some(unit) = req.unit {
        product.unit = unit;
    }
    product.updated_at = Utc::now();
    state.db.products().update(&product).await?;

    Ok(Json(json!({ "message": "Product updated successfully" })))
}

/// Pre-delete check: how many order lines reference this product.
pub async fn check_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let count = state.db.products().order_item_count(&id).await?;
    Ok(Json(json!({
        "has_order_items": count > 0,
        "order_item_count": count,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let items_removed = state.db.products().delete(&id).await?;
    Ok(Json(json!({
        "message": format!("Product and {items_removed} order item(s) deleted successfully"),
        "order_items_removed": items_removed,
    })))
}
