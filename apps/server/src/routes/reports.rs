//! Reporting, dashboard, and search endpoints.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, NaiveDate, Utc};
use materia_core::Product;
use materia_db::{DashboardSummary, PendingDelivery, SalesReportRow};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Sales report over a date range, defaulting to the current month so far.
pub async fn sales(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> ApiResult<Json<Vec<SalesReportRow>>> {
    let today = Utc::now().date_naive();
    let start = query
        .start_date
        .unwrap_or_else(|| today.with_day(1).unwrap_or(today));
    let end = query.end_date.unwrap_or(today);
    if start > end {
        return Err(ApiError::BadRequest(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok(Json(state.db.reports().sales_report(start, end).await?))
}

pub async fn low_stock(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(
        state.db.reports().low_stock(state.low_stock_threshold).await?,
    ))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.db.reports().dashboard(today).await?))
}

pub async fn pending_deliveries(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PendingDelivery>>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.db.reports().pending_deliveries(today).await?))
}

/// Cross-entity search: `?q=...&type=customers|products|orders`.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Value>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(ApiError::BadRequest("q must not be empty".to_string()));
    }

    let results = match query.kind.as_str() {
        "customers" => json!(state.db.customers().search(q).await?),
        "products" => json!(state.db.products().search(q).await?),
        "orders" => {
            // Orders have no free-text field of their own; match on the
            // customer name.
            let needle = q.to_lowercase();
            let orders: Vec<_> = state
                .db
                .orders()
                .list_with_details()
                .await?
                .into_iter()
                .filter(|o| o.customer_name.to_lowercase().contains(&needle))
                .collect();
            json!(orders)
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "unknown search type: {other}"
            )))
        }
    };
    Ok(Json(results))
}
