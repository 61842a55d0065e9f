use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use folio_core::error::Error;
use folio_core::splitter::{ChunkingConfig, TextSplitter};
use folio_core::traits::{Embedder, VectorIndex};
use folio_core::types::{Metric, Publication};
use folio_embed::HashEmbedder;
use folio_index::{CorpusIndexer, NullIndex};
use folio_responder::{
    CompletionError, LanguageModel, PromptSpec, Responder, ResponderOptions, SideData,
};

const RESUME: &str = "Skills: Python, SQL\n---\nExperience: 2 years at Acme Corp\n---\nPublications: none";

/// Answers with the rendered user turn, i.e. question plus grounding.
struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &PromptSpec) -> Result<String, CompletionError> {
        Ok(prompt.user_message())
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    async fn complete(&self, _prompt: &PromptSpec) -> Result<String, CompletionError> {
        Err(CompletionError::Transport("connection refused".into()))
    }
}

struct SlowModel;

#[async_trait]
impl LanguageModel for SlowModel {
    async fn complete(&self, _prompt: &PromptSpec) -> Result<String, CompletionError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".into())
    }
}

struct BlankModel;

#[async_trait]
impl LanguageModel for BlankModel {
    async fn complete(&self, _prompt: &PromptSpec) -> Result<String, CompletionError> {
        Ok("   ".into())
    }
}

/// Counts calls so tests can assert the embedder was never reached.
struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
}

impl Embedder for CountingEmbedder {
    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts)
    }
}

fn options() -> ResponderOptions {
    ResponderOptions {
        top_k: 1,
        timeout: Duration::from_millis(200),
        subject_name: "Ada".into(),
        fallback_message: "FALLBACK".into(),
        empty_query_message: "ASK SOMETHING".into(),
    }
}

fn side_data() -> Arc<SideData> {
    Arc::new(SideData::new(
        vec![Publication { title: "Paper A".into(), link: "http://x".into() }],
        &["publications", "doi", "research"],
    ))
}

fn responder_with(llm: Arc<dyn LanguageModel>, embedder: Arc<dyn Embedder>) -> Responder {
    let splitter = TextSplitter::new(ChunkingConfig::default()).unwrap();
    let index: Arc<dyn VectorIndex> =
        CorpusIndexer::new(splitter, embedder.clone(), Metric::Cosine).index_document(RESUME).unwrap();
    Responder::new(index, embedder, side_data(), llm, options())
}

fn responder(llm: Arc<dyn LanguageModel>) -> Responder {
    responder_with(llm, Arc::new(HashEmbedder::new(1024)))
}

#[tokio::test]
async fn skills_question_is_grounded_in_skills_section() {
    let r = responder(Arc::new(EchoModel));
    let prompt = r.prepare("What are the skills?").unwrap();
    assert_eq!(prompt.grounding, "Skills: Python, SQL");

    let answer = r.respond("What are the skills?").await;
    assert!(answer.contains("Python, SQL"), "answer was {answer:?}");
}

#[tokio::test]
async fn publications_question_appends_side_data() {
    let r = responder(Arc::new(EchoModel));
    let prompt = r.prepare("Any publications?").unwrap();
    assert!(prompt.grounding.lines().any(|l| l == "- Paper A (http://x)"));

    let answer = r.respond("Any publications?").await;
    assert!(answer.contains("- Paper A (http://x)"));
}

#[tokio::test]
async fn unrelated_question_has_no_side_data() {
    let r = responder(Arc::new(EchoModel));
    let prompt = r.prepare("Where did Ada work?").unwrap();
    assert!(!prompt.grounding.contains("Paper A"));
}

#[tokio::test]
async fn model_failure_becomes_fallback() {
    assert_eq!(responder(Arc::new(FailingModel)).respond("What are the skills?").await, "FALLBACK");
}

#[tokio::test]
async fn model_timeout_becomes_fallback() {
    assert_eq!(responder(Arc::new(SlowModel)).respond("What are the skills?").await, "FALLBACK");
}

#[tokio::test]
async fn blank_model_answer_becomes_fallback() {
    assert_eq!(responder(Arc::new(BlankModel)).respond("What are the skills?").await, "FALLBACK");
}

#[tokio::test]
async fn empty_query_never_reaches_embedder() {
    let embedder = Arc::new(CountingEmbedder { inner: HashEmbedder::new(1024), calls: AtomicUsize::new(0) });
    let r = responder_with(Arc::new(EchoModel), embedder.clone());
    let indexing_calls = embedder.calls.load(Ordering::SeqCst);

    assert_eq!(r.respond("   \n").await, "ASK SOMETHING");
    assert_eq!(embedder.calls.load(Ordering::SeqCst), indexing_calls);

    let err = r.prepare("   ").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::EmptyQuery)), "{err:?}");
    assert_eq!(embedder.calls.load(Ordering::SeqCst), indexing_calls);

    r.respond("skills").await;
    assert_eq!(embedder.calls.load(Ordering::SeqCst), indexing_calls + 1);
}

#[tokio::test]
async fn null_index_still_answers_without_grounding() {
    let r = Responder::new(
        Arc::new(NullIndex),
        Arc::new(HashEmbedder::new(1024)),
        Arc::new(SideData::default()),
        Arc::new(EchoModel),
        options(),
    );
    let prompt = r.prepare("What are the skills?").unwrap();
    assert!(!prompt.has_grounding());
    let answer = r.respond("What are the skills?").await;
    assert!(answer.contains("no relevant résumé excerpts"));
}

#[tokio::test]
async fn concurrent_requests_share_one_responder() {
    let r = responder(Arc::new(EchoModel));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let r = r.clone();
            tokio::spawn(async move { r.respond("What are the skills?").await })
        })
        .collect();
    for h in handles {
        assert!(h.await.unwrap().contains("Python, SQL"));
    }
}
