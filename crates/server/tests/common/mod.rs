#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use tower::ServiceExt;

use tradebook::record::SqlTradeStore;
use tradebook::server::{router, AppState};

/// 인메모리 SQLite 저장소. 연결이 하나뿐이어야 같은 DB 를 본다.
pub async fn memory_store() -> Arc<SqlTradeStore> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Arc::new(SqlTradeStore::from_connection(db).await.unwrap())
}

pub async fn test_app() -> (Router, Arc<SqlTradeStore>) {
    let store = memory_store().await;
    let app = router(AppState::new(store.clone()));
    (app, store)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_trade(app: &Router, payload: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/trades/")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

/// 외부 별칭을 쓰는 정상 거래 본문
pub fn trade_payload(trade_id: &str, price: f64, side: &str) -> Value {
    json!({
        "assetClass": "Equity",
        "counterparty": "Goldman Sachs",
        "instrumentId": "TSLA",
        "instrumentName": "Tesla Inc",
        "tradeDateTime": "2022-06-08T10:30:00",
        "tradeDetails": {
            "buySellIndicator": side,
            "price": price,
            "quantity": 10
        },
        "tradeId": trade_id,
        "trader": "Alice Smith"
    })
}

pub fn prices(trades: &Value) -> Vec<f64> {
    trades
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tradeDetails"]["price"].as_f64().unwrap())
        .collect()
}

pub fn trade_ids(trades: &Value) -> Vec<String> {
    trades
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["tradeId"].as_str().unwrap().to_string())
        .collect()
}
