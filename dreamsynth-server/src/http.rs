//! DreamSynth HTTP API
//!
//! Axum-based HTTP server exposing dream generation and the dream journal.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to a pure
//! inner function. The inner functions are directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - GET  /             — liveness check
//! - POST /generate     — generate a dream from a prompt
//! - POST /submit_dream — save a dream record
//! - GET  /dreams       — list saved dream records, newest first

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use dreamsynth_core::{
    CompletionClient, CorsConfig, DreamRecord, DreamStore, DreamSynthConfig,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub store: DreamStore,
    pub completion: CompletionClient,
}

/// Build the Axum router with all endpoints and the CORS layer.
pub fn build_router(state: Arc<HttpState>, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/generate", post(generate_handler))
        .route("/submit_dream", post(submit_dream_handler))
        .route("/dreams", get(dreams_handler))
        .layer(cors_layer(cors))
        .with_state(state)
}

/// CORS layer restricted to the configured origins. Requests from other
/// origins are still served; browsers enforce the restriction client-side.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins = cors.allowed_origins.iter().filter_map(|origin| {
        match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        }
    });

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    config: DreamSynthConfig,
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let app = build_router(state, &config.cors);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("DreamSynth backend listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitDreamRequest {
    pub title: Option<String>,
    pub mood: Option<String>,
    pub content: Option<String>,
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner generate — validates the prompt and calls the completion client.
pub async fn generate_inner(
    completion: &CompletionClient,
    req: GenerateRequest,
) -> (StatusCode, serde_json::Value) {
    let prompt = match req.prompt.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "No prompt provided." }),
            );
        }
    };

    match completion.complete(&prompt).await {
        Ok(dream) => (StatusCode::OK, serde_json::json!({ "dream": dream })),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": format!("Request failed: {}", e) }),
        ),
    }
}

/// Inner submit — validates the fields, stamps the record, appends it.
pub async fn submit_dream_inner(
    store: &DreamStore,
    req: SubmitDreamRequest,
) -> (StatusCode, serde_json::Value) {
    let title = req.title.as_deref().map_or("", str::trim);
    let mood = req.mood.as_deref().map_or("", str::trim);
    let content = req.content.as_deref().map_or("", str::trim);

    if title.is_empty() || mood.is_empty() || content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "Missing fields" }),
        );
    }

    let record = DreamRecord::new(title, mood, content);

    match store.append(record).await {
        Ok(()) => (
            StatusCode::OK,
            serde_json::json!({ "message": "Dream saved!" }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": e.to_string() }),
        ),
    }
}

/// Inner list — loads the full collection, newest first.
pub async fn list_dreams_inner(store: &DreamStore) -> (StatusCode, serde_json::Value) {
    match store.list().await {
        Ok(dreams) => (StatusCode::OK, serde_json::json!({ "dreams": dreams })),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": e.to_string() }),
        ),
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn home_handler() -> &'static str {
    "🌙 DreamSynth backend is live."
}

pub async fn generate_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let (status, body) = generate_inner(&state.completion, req).await;
    (status, Json(body))
}

pub async fn submit_dream_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<SubmitDreamRequest>,
) -> impl IntoResponse {
    let (status, body) = submit_dream_inner(&state.store, req).await;
    (status, Json(body))
}

pub async fn dreams_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = list_dreams_inner(&state.store).await;
    (status, Json(body))
}

// ============================================================================
// Unit Tests — call inner functions directly
// ============================================================================
