use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use folio_responder::Responder;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Clone)]
struct AppState {
    responder: Responder,
    chunks: usize,
}

/// `POST /v1/chat` answers one query; `GET /health` reports readiness.
/// Built only from a fully bootstrapped responder, so every request sees the
/// complete index.
pub fn router(responder: Responder, chunks: usize) -> Router {
    Router::new()
        .route("/v1/chat", post(chat))
        .route("/health", get(health))
        .with_state(AppState { responder, chunks })
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let answer = state.responder.respond(&req.query).await;
    Json(ChatResponse { answer })
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "chunks": state.chunks })))
}
