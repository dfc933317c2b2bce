//! HTTP gateway for the storefront.
//!
//! Routes:
//! - `POST /api/chat` (also `/chat`) — answer a support message
//! - `GET /api/orders`, `GET /api/orders/{order_id}`
//! - `GET /api/products`, `GET /api/products/{category}`
//! - `GET /api/health`
//!
//! Any origin may call the API. A panicking handler is turned into the
//! generic apology with status 500.

use std::any::Any;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

use crate::agent::{ChatError, SupportAgent, APOLOGY_REPLY, EMPTY_MESSAGE_REPLY};
use crate::config::GatewayConfig;

/// Maximum request body size (64KB).
pub const MAX_BODY_SIZE: usize = 65_536;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<SupportAgent>,
}

/// Chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/chat", post(handle_chat))
        .route("/api/orders", get(handle_orders))
        .route("/api/orders/{order_id}", get(handle_order))
        .route("/api/products", get(handle_products))
        .route("/api/products/{category}", get(handle_products_by_category))
        .route("/api/health", get(handle_health))
        .with_state(state);
    with_layers(api)
}

fn with_layers(app: Router) -> Router {
    app.layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// Serve until `shutdown` is cancelled.
pub async fn run_gateway(
    gateway: &GatewayConfig,
    agent: Arc<SupportAgent>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", gateway.host, gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr()?;

    info!(
        addr = %local,
        data_dir = %agent.store().dir().display(),
        provider = agent.responder().provider_name(),
        "Gateway listening"
    );

    axum::serve(listener, router(AppState { agent }))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Gateway server error")?;

    info!("Gateway stopped");
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════
// HANDLERS
// ══════════════════════════════════════════════════════════════════════

fn reply_body(status: StatusCode, reply: &str) -> Response {
    (status, Json(serde_json::json!({ "reply": reply }))).into_response()
}

/// POST /api/chat
async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let message = match body {
        Ok(Json(req)) => req.message.unwrap_or_default(),
        Err(e) => {
            warn!("Chat JSON parse error: {e}");
            String::new()
        }
    };

    match state.agent.respond(&message).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(ChatError::EmptyMessage) => reply_body(StatusCode::BAD_REQUEST, EMPTY_MESSAGE_REPLY),
    }
}

/// GET /api/orders
async fn handle_orders(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.agent.store().orders().await)
}

/// GET /api/orders/{order_id}
async fn handle_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Response {
    let orders = state.agent.store().orders().await;
    let normalized = order_id.to_uppercase();

    match crate::agent::orders::find_order(&normalized, &orders) {
        Some(order) => Json(order).into_response(),
        None => {
            let body = serde_json::json!({
                "error": "Order not found",
                "message": format!("Order {normalized} could not be found. Please verify your order ID."),
            });
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}

/// GET /api/products
async fn handle_products(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.agent.store().products().await)
}

/// GET /api/products/{category}
async fn handle_products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    let wanted = category.to_lowercase();
    let products: Vec<_> = state
        .agent
        .store()
        .products()
        .await
        .into_iter()
        .filter(|p| p.category.to_lowercase() == wanted)
        .collect();
    Json(products)
}

/// GET /api/health
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");
    reply_body(StatusCode::INTERNAL_SERVER_ERROR, APOLOGY_REPLY)
}
