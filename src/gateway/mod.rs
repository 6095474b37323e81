//! HTTP gateway (Axum).
//!
//! This module is primarily used by the `docqa` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{ask_handler, sessions_handler};
pub use state::AppState;

use crate::llm::ChatBackend;
use crate::retrieval::PassageStore;

/// Response header carrying the retrieval strategy of the request.
pub const STRATEGY_HEADER: &str = "X-Docqa-Retrieval";

pub fn create_router_with_state<S, C>(state: AppState<S, C>) -> Router
where
    S: PassageStore + 'static,
    C: ChatBackend + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<S, C>))
        .route("/v1/ask", post(ask_handler::<S, C>))
        .route("/v1/sessions", get(sessions_handler::<S, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub cached_queries: usize,
    pub reranker_initialized: bool,
}

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

pub async fn ready_handler<S, C>(
    axum::extract::State(state): axum::extract::State<AppState<S, C>>,
) -> impl IntoResponse
where
    S: PassageStore + 'static,
    C: ChatBackend + 'static,
{
    Json(ReadyResponse {
        status: "ready",
        cached_queries: state.searcher.cache_len(),
        reranker_initialized: state.searcher.reranker_initialized(),
    })
}
