//! End-to-end API tests driving the router in-process.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use materia_core::LOW_STOCK_THRESHOLD;
use materia_db::{Database, DbConfig};
use materia_server::routes;
use materia_server::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    routes::router(AppState::new(db, LOW_STOCK_THRESHOLD))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_customer(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/customers",
        Some(json!({
            "name": name,
            "phone": "0300-1234567",
            "address": "12 Canal Road",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, name: &str, price_cents: i64, stock: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/products",
        Some(json!({
            "name": name,
            "price_cents": price_cents,
            "stock_quantity": stock,
            "unit": "bag",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn product_stock(app: &Router, id: &str) -> i64 {
    let (_, products) = send(app, Method::GET, "/api/products", None).await;
    products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id)
        .unwrap()["stock_quantity"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = test_app().await;
    let id = create_customer(&app, "Akbar Traders").await;

    let (status, customers) = send(&app, Method::GET, "/api/customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(customers.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/customers/{id}"),
        Some(json!({ "name": "Akbar & Sons" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, check) = send(
        &app,
        Method::GET,
        &format!("/api/customers/{id}/check-orders"),
        None,
    )
    .await;
    assert_eq!(check["order_count"], 0);
    assert_eq!(check["has_orders"], false);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders_deleted"], 0);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_validation_rejects_blank_name() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/customers",
        Some(json!({ "name": "  ", "phone": "123", "address": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn order_lifecycle_moves_stock_both_ways() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let cement_id = create_product(&app, "Cement 50kg", 1050, 100).await;
    let today = Utc::now().date_naive();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "items": [{ "product_id": cement_id, "quantity": 20 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total_amount_cents"], 21_000);
    let order_id = body["id"].as_str().unwrap().to_string();

    assert_eq!(product_stock(&app, &cement_id).await, 80);

    // The listing embeds customer and item names.
    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    let order = &orders.as_array().unwrap()[0];
    assert_eq!(order["customer_name"], "Akbar Traders");
    assert_eq!(order["items"][0]["product_name"], "Cement 50kg");
    assert_eq!(order["payment_status"], "Unpaid");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products_restocked"], 1);
    assert_eq!(product_stock(&app, &cement_id).await, 100);
}

#[tokio::test]
async fn oversized_order_is_rejected_without_side_effects() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let cement_id = create_product(&app, "Cement 50kg", 1050, 5).await;
    let today = Utc::now().date_naive();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "items": [{ "product_id": cement_id, "quantity": 6 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("insufficient stock"));

    assert_eq!(product_stock(&app, &cement_id).await, 5);
    let (_, orders) = send(&app, Method::GET, "/api/orders", None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn empty_item_list_is_a_bad_request() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let today = Utc::now().date_naive();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "items": [],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_for_unknown_customer_is_not_found() {
    let app = test_app().await;
    let cement_id = create_product(&app, "Cement 50kg", 1050, 100).await;
    let today = Utc::now().date_naive();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": "ghost",
            "order_date": today,
            "items": [{ "product_id": cement_id, "quantity": 1 }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payments_settle_an_order() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let cement_id = create_product(&app, "Cement 50kg", 1000, 100).await;
    let today = Utc::now().date_naive();

    // $40 order with a $10 partial payment taken at the counter.
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "items": [{ "product_id": cement_id, "quantity": 4 }],
            "payment_status": "Partial",
            "payment_amount_cents": 1000,
            "payment_method": "cash",
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();

    // Settling the outstanding $30 flips the order to Paid.
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/payments",
        Some(json!({
            "order_id": order_id,
            "amount_cents": 3000,
            "payment_method": "bank_transfer",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], "Paid");

    let (_, payments) = send(&app, Method::GET, "/api/payments", None).await;
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p["customer_name"] == "Akbar Traders"));
}

#[tokio::test]
async fn zero_amount_payment_is_rejected() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/payments",
        Some(json!({ "order_id": "whatever", "amount_cents": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_edit_synthesizes_payment_once() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let cement_id = create_product(&app, "Cement 50kg", 1000, 100).await;
    let today = Utc::now().date_naive();

    let (_, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "items": [{ "product_id": cement_id, "quantity": 10 }],
        })),
    )
    .await;
    let order_id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{order_id}"),
        Some(json!({ "payment_status": "Paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_status"], "Paid");

    let (_, payments) = send(&app, Method::GET, "/api/payments", None).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments.as_array().unwrap()[0]["amount_cents"], 10_000);
}

#[tokio::test]
async fn dashboard_and_reports_respond() {
    let app = test_app().await;
    let customer_id = create_customer(&app, "Akbar Traders").await;
    let cement_id = create_product(&app, "Cement 50kg", 1000, 3).await;
    let today = Utc::now().date_naive();

    send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customer_id": customer_id,
            "order_date": today,
            "delivery_date": today,
            "items": [{ "product_id": cement_id, "quantity": 2 }],
        })),
    )
    .await;

    let (status, dashboard) = send(&app, Method::GET, "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["orders_today"], 1);
    assert_eq!(dashboard["outstanding_cents"], 2000);

    let (status, low) = send(&app, Method::GET, "/api/reports/low-stock", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(low.as_array().unwrap().len(), 1);

    let (status, sales) = send(&app, Method::GET, "/api/reports/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 1);

    let (status, due) = send(&app, Method::GET, "/api/dashboard/pending-deliveries", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(due.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_dispatches_on_type() {
    let app = test_app().await;
    create_customer(&app, "Akbar Traders").await;
    create_product(&app, "Cement 50kg", 1000, 10).await;

    let (status, hits) = send(&app, Method::GET, "/api/search?q=akbar&type=customers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (status, hits) = send(&app, Method::GET, "/api/search?q=cement&type=products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/api/search?q=x&type=invoices", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
