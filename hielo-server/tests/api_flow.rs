//! End-to-end API flow over the in-process router.
//!
//! Drives the real axum app (auth middleware included) against a temporary
//! SQLite database: start day → loading batch → sales batch → returns batch
//! → reconciliation view.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use hielo_server::auth::JwtConfig;
use hielo_server::auth::permissions::get_default_permissions;
use hielo_server::{Config, JwtService, ServerState, routes};

const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars!";

async fn test_app() -> (tempfile::TempDir, ServerState, Router) {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::from_env();
    config.work_dir = dir.path().to_string_lossy().to_string();
    config.jwt = JwtConfig {
        secret: TEST_SECRET.to_string(),
        expiration_minutes: 60,
        issuer: "hielo-auth".to_string(),
        audience: "hielo-ops".to_string(),
    };

    let state = ServerState::initialize(&config).await;

    // Seed the directory tables the core reads from
    for sql in [
        "INSERT INTO driver (id, name, is_active) VALUES (7, 'Marco', 1)",
        "INSERT INTO product (id, name, default_unit_price) VALUES (9, 'Ice bag 5kg', 10.0)",
        "INSERT INTO customer (id, name, route_id, is_active) VALUES (1, 'Bar Sol', 3, 1)",
    ] {
        sqlx::query(sql).execute(&state.pool).await.unwrap();
    }

    let app = routes::build_app(&state).with_state(state.clone());
    (dir, state, app)
}

fn token(state: &ServerState, role: &str) -> String {
    let svc = JwtService::with_config(state.config.jwt.clone());
    svc.generate_token(1001, "marta", role, &get_default_permissions(role))
        .unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(json_body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_full_day_flow() {
    let (_dir, state, app) = test_app().await;
    let token = token(&state, "area_manager");

    // 1. Start the day (idempotent)
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sales-ops/driver-daily-summaries",
            Some(&token),
            Some(json!({"driver_id": 7, "sale_date": "2024-03-01"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = json_body(response).await;
    let summary_id = summary["id"].as_i64().unwrap();

    // Starting again returns the same summary
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sales-ops/driver-daily-summaries",
            Some(&token),
            Some(json!({"driver_id": 7, "sale_date": "2024-03-01"})),
        ))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["id"].as_i64().unwrap(), summary_id);

    // 2. Record the morning load
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/loading-logs",
            Some(&token),
            Some(json!({
                "driver_id": 7,
                "load_type": "INITIAL",
                "log_date": "2024-03-01",
                "items": [{"product_id": 9, "quantity_loaded": 100.0}]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 3. Submit the day's sales (one valid, one unknown customer)
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sales-ops/sales-entry/batch",
            Some(&token),
            Some(json!({
                "driver_daily_summary_id": summary_id,
                "sales_data": [
                    {
                        "customer_id": 1,
                        "payment_type": "CASH",
                        "items": [{"product_id": 9, "quantity_sold": 60.0, "unit_price": 15.0, "transaction_type": "SALE"}]
                    },
                    {
                        "customer_id": 404,
                        "payment_type": "CASH",
                        "items": [{"product_id": 9, "quantity_sold": 1.0}]
                    }
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome = json_body(response).await;
    assert_eq!(outcome["processed_sales"].as_i64().unwrap(), 1);
    assert_eq!(outcome["skipped_sales"].as_i64().unwrap(), 1);
    assert_eq!(outcome["total_amount"].as_f64().unwrap(), 900.0);
    assert_eq!(
        outcome["summary"]["total_cash_sales_value"].as_f64().unwrap(),
        900.0
    );

    // 4. Submit returns
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/sales-ops/batch-returns",
            Some(&token),
            Some(json!({
                "driver_id": 7,
                "return_date": "2024-03-01",
                "driver_daily_summary_id": summary_id,
                "product_items": [{"product_id": 9, "quantity_returned": 30.0}],
                "packaging_items": []
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 5. Reconciliation: loaded 100, sold 60, returned 30 → loss 10
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            "/api/sales-ops/reconciliation-summary?driver_id=7&date=2024-03-01",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    let rows = view["product_reconciliation"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["loaded"].as_f64().unwrap(), 100.0);
    assert_eq!(rows[0]["sold"].as_f64().unwrap(), 60.0);
    assert_eq!(rows[0]["returned"].as_f64().unwrap(), 30.0);
    assert_eq!(rows[0]["loss"].as_f64().unwrap(), 10.0);
}

#[tokio::test]
async fn test_reconciliation_requires_started_day() {
    let (_dir, state, app) = test_app().await;
    let token = token(&state, "area_manager");

    let response = app
        .oneshot(request(
            "GET",
            "/api/sales-ops/reconciliation-summary?driver_id=7&date=2024-03-09",
            Some(&token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(request(
            "GET",
            "/api/sales-ops/driver-daily-summaries",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_cannot_write() {
    let (_dir, state, app) = test_app().await;
    let token = token(&state, "viewer");

    let response = app
        .oneshot(request(
            "POST",
            "/api/sales-ops/driver-daily-summaries",
            Some(&token),
            Some(json!({"driver_id": 7, "sale_date": "2024-03-01"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_is_public() {
    let (_dir, _state, app) = test_app().await;

    let response = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"].as_str().unwrap(), "ok");
}
