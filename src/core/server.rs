use crate::core::schedule::DeliveryLog;
use crate::utils::error::{BotError, Result};
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::future::Future;
use tokio::net::TcpListener;

pub const ALIVE_MESSAGE: &str = "Bot is alive!";

#[derive(Clone)]
pub struct ServerState {
    pub deliveries: DeliveryLog,
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .with_state(state)
}

/// GET / - keep-alive probe used by the hosting platform
async fn home() -> &'static str {
    ALIVE_MESSAGE
}

/// GET /health
async fn health_check(State(state): State<ServerState>) -> Json<Value> {
    let last_delivery = state.deliveries.last().await;
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "last_delivery": last_delivery,
    }))
}

pub async fn serve<F>(addr: &str, state: ServerState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.map_err(|e| BotError::ServerError {
        message: format!("failed to bind {}: {}", addr, e),
    })?;
    tracing::info!("🌐 Keep-alive server listening on {}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Keep-alive server stopped");
    Ok(())
}
