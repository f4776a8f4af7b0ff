//! Customer endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use materia_core::{validation, Customer};
use materia_db::generate_id;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    validation::validate_name(&req.name)?;
    validation::validate_phone(&req.phone)?;
    validation::validate_address(&req.address)?;

    let now = Utc::now();
    let customer = Customer {
        id: generate_id(),
        name: req.name.trim().to_string(),
        phone: req.phone.trim().to_string(),
        address: req.address.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    state.db.customers().insert(&customer).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Customer created successfully",
            "id": customer.id,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCustomerRequest>,
) -> ApiResult<Json<Value>> {
    let mut customer = state.db.customers().get_by_id(&id).await?;

    if let Some(name) = req.name {
        validation::validate_name(&name)?;
        customer.name = name.trim().to_string();
    }
    if let Some(phone) = req.phone {
        validation::validate_phone(&phone)?;
        customer.phone = phone.trim().to_string();
    }
    if let Some(address) = req.address {
        validation::validate_address(&address)?;
        customer.address = address.trim().to_string();
    }
    customer.updated_at = Utc::now();
    state.db.customers().update(&customer).await?;

    Ok(Json(json!({ "message": "Customer updated successfully" })))
}

/// Pre-delete check: how many orders would go down with this customer.
pub async fn check_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let count = state.db.customers().order_count(&id).await?;
    Ok(Json(json!({
        "has_orders": count > 0,
        "order_count": count,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let orders_deleted = state.db.customers().delete(&id).await?;
    Ok(Json(json!({
        "message": format!("Customer and {orders_deleted} order(s) deleted successfully"),
        "orders_deleted": orders_deleted,
    })))
}
