//! HTTP front end.
//!
//! # Routes
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /?urls=a,b,c` | Analyze a comma-separated batch of URLs |
//! | `GET /health` | Liveness check |
//!
//! A missing or empty `urls` parameter yields an empty JSON array. A batch
//! over the limit yields `400` with an `error` message and no analysis.

use crate::batch::{BatchOrchestrator, BatchRejected};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

pub struct AppState {
    pub batch: BatchOrchestrator,
}

#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    urls: Option<String>,
}

/// Split the raw `urls` parameter into trimmed, non-empty URLs.
pub fn parse_urls(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle_articles_query))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
#[instrument(level = "info", skip(state))]
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        addr = %listener.local_addr()?,
        max_urls = state.batch.max_urls(),
        "Listening"
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_articles_query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticlesQuery>,
) -> impl IntoResponse {
    let urls = parse_urls(query.urls.as_deref());
    if urls.is_empty() {
        return Json(serde_json::json!([])).into_response();
    }

    match state.batch.run_batch(urls).await {
        Ok(results) => Json(results).into_response(),
        Err(rejected @ BatchRejected::TooMany { got, .. }) => {
            warn!(got, "Answering 400 to oversized batch");
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": rejected.to_string() })),
            )
                .into_response()
        }
        Err(BatchRejected::Empty) => Json(serde_json::json!([])).into_response(),
    }
}
