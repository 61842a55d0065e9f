use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use folio_cli::server::{router, ChatResponse};
use folio_core::splitter::{ChunkingConfig, TextSplitter};
use folio_core::traits::VectorIndex;
use folio_core::types::Metric;
use folio_embed::HashEmbedder;
use folio_index::CorpusIndexer;
use folio_responder::{CompletionError, LanguageModel, PromptSpec, Responder, ResponderOptions, SideData};

struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &PromptSpec) -> Result<String, CompletionError> {
        Ok(prompt.user_message())
    }
}

fn app() -> axum::Router {
    let embedder = Arc::new(HashEmbedder::new(1024));
    let splitter = TextSplitter::new(ChunkingConfig::default()).unwrap();
    let index = CorpusIndexer::new(splitter, embedder.clone(), Metric::Cosine)
        .index_document("Skills: Python, SQL\n---\nExperience: 2 years at Acme Corp")
        .unwrap();
    let chunks = index.len();
    let options = ResponderOptions {
        top_k: 1,
        timeout: Duration::from_secs(2),
        empty_query_message: "ASK SOMETHING".into(),
        ..ResponderOptions::default()
    };
    let responder = Responder::new(index, embedder, Arc::new(SideData::default()), Arc::new(EchoModel), options);
    router(responder, chunks)
}

async fn chat(body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::post("/v1/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    let status = res.status();
    (status, to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec())
}

#[tokio::test]
async fn chat_returns_grounded_answer() {
    let (status, body) = chat(r#"{"query": "What are the skills?"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let res: ChatResponse = serde_json::from_slice(&body).unwrap();
    assert!(res.answer.contains("Python, SQL"), "{}", res.answer);
}

#[tokio::test]
async fn blank_query_gets_validation_message() {
    let (status, body) = chat(r#"{"query": "  "}"#).await;
    assert_eq!(status, StatusCode::OK);
    let res: ChatResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(res.answer, "ASK SOMETHING");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (status, _) = chat(r#"{"question": "hi"}"#).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn health_reports_chunk_count() {
    let res = app().oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&to_bytes(res.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chunks"], 2);
}
