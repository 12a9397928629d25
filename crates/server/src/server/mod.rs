pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::record::TradeStore;

pub use error::ApiError;

/// 핸들러가 공유하는 상태. 저장소 핸들은 시작 시 한 번 만들어 주입한다.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TradeStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn TradeStore>) -> Self {
        Self { store }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route(
            "/trades/",
            post(handlers::create_trade).get(handlers::search_trades),
        )
        .route(
            "/trades",
            post(handlers::create_trade).get(handlers::search_trades),
        )
        .route("/trades/list", get(handlers::list_trades))
        .route("/trades/filter", get(handlers::filter_trades))
        .route("/trades/id/:trade_id", get(handlers::get_trade))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API 서버 실행. Ctrl-C 를 받으면 진행 중인 요청을 마치고 종료한다.
pub async fn start_server(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
