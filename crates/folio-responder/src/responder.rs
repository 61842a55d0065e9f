use std::sync::Arc;
use std::time::Duration;

use folio_core::config::Settings;
use folio_core::error::Error;
use folio_core::traits::{Embedder, VectorIndex};

use crate::llm::LanguageModel;
use crate::prompt::{build_prompt, PromptSpec};
use crate::retrieve::retrieve;
use crate::side_data::{augment_with_side_data, SideData};

#[derive(Debug, Clone)]
pub struct ResponderOptions {
    pub top_k: usize,
    pub timeout: Duration,
    pub subject_name: String,
    pub fallback_message: String,
    pub empty_query_message: String,
}

impl ResponderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            timeout: Duration::from_secs(settings.llm.timeout_secs),
            subject_name: settings.responder.subject_name.clone(),
            fallback_message: settings.responder.fallback_message.clone(),
            empty_query_message: settings.responder.empty_query_message.clone(),
        }
    }
}

impl Default for ResponderOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Answers one query at a time from the immutable index and side data.
/// Holds no per-request state, so a single instance can serve concurrent
/// callers.
#[derive(Clone)]
pub struct Responder {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn Embedder>,
    side_data: Arc<SideData>,
    llm: Arc<dyn LanguageModel>,
    options: ResponderOptions,
}

impl Responder {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        side_data: Arc<SideData>,
        llm: Arc<dyn LanguageModel>,
        options: ResponderOptions,
    ) -> Self {
        Self { index, embedder, side_data, llm, options }
    }

    pub fn options(&self) -> &ResponderOptions {
        &self.options
    }

    /// retrieve → augment → build_prompt, without calling the model.
    /// A blank query is rejected with `Error::EmptyQuery`.
    pub fn prepare(&self, query: &str) -> anyhow::Result<PromptSpec> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::EmptyQuery.into());
        }
        let retrieved = retrieve(query, self.index.as_ref(), self.embedder.as_ref(), self.options.top_k)?;
        let grounding = augment_with_side_data(query, &retrieved.grounding, &self.side_data);
        Ok(build_prompt(query, &grounding, &self.options.subject_name))
    }

    /// The single operation exposed to the UI layer. Always returns text:
    /// failures become the configured fallback message.
    pub async fn respond(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return self.options.empty_query_message.clone();
        }
        let prompt = match self.prepare(query) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::warn!(error = %e, "retrieval failed");
                return self.options.fallback_message.clone();
            }
        };
        if !prompt.has_grounding() {
            tracing::info!("no grounding for query; model will be told so");
        }
        match tokio::time::timeout(self.options.timeout, self.llm.complete(&prompt)).await {
            Ok(Ok(answer)) if !answer.trim().is_empty() => answer,
            Ok(Ok(_)) => {
                tracing::warn!("language model returned an empty answer");
                self.options.fallback_message.clone()
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "language model call failed");
                self.options.fallback_message.clone()
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.options.timeout, "language model call timed out");
                self.options.fallback_message.clone()
            }
        }
    }
}
