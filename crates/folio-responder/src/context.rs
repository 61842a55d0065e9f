use anyhow::{Context as _, Result};
use std::sync::Arc;

use folio_core::config::{Config, Settings};
use folio_core::document::load_publications;
use folio_core::splitter::TextSplitter;
use folio_core::traits::{Embedder, VectorIndex};
use folio_embed::build_embedder;
use folio_index::CorpusIndexer;

use crate::llm::{LanguageModel, OpenAiCompatibleModel};
use crate::responder::{Responder, ResponderOptions};
use crate::side_data::SideData;

/// Everything built once at startup. Any failure here is fatal: the caller
/// must not serve queries from a partially built context.
pub struct AppContext {
    pub settings: Settings,
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
    pub side_data: Arc<SideData>,
    pub llm: Arc<dyn LanguageModel>,
}

impl AppContext {
    pub fn bootstrap(config: &Config) -> Result<Self> {
        let settings = config.settings()?;
        let api_key = std::env::var(&settings.llm.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(var = %settings.llm.api_key_env, "no API key set; calling the model endpoint without one");
        }
        let llm = Arc::new(OpenAiCompatibleModel::new(&settings.llm, api_key)?);
        Self::bootstrap_with(config, llm)
    }

    /// Like [`AppContext::bootstrap`] with an injected language model.
    pub fn bootstrap_with(config: &Config, llm: Arc<dyn LanguageModel>) -> Result<Self> {
        let settings = config.settings()?;

        let model_dir = config.resolve_path(&settings.embedding.model_dir);
        let embedder = build_embedder(&settings.embedding, &model_dir).context("embedding model unavailable")?;

        let splitter = TextSplitter::new(settings.chunking.clone())?;
        let indexer = CorpusIndexer::new(splitter, embedder.clone(), settings.retrieval.metric);
        let resume_path = config.resolve_path(&settings.data.resume_path);
        let index = indexer
            .index_file(&resume_path)
            .with_context(|| format!("indexing {}", resume_path.display()))?;

        let publications = match &settings.data.publications_path {
            Some(p) => load_publications(&config.resolve_path(p))?,
            None => Vec::new(),
        };
        tracing::info!(publications = publications.len(), "side data loaded");
        let side_data = Arc::new(SideData::new(publications, &settings.responder.trigger_keywords));

        Ok(Self { settings, embedder, index, side_data, llm })
    }

    pub fn responder(&self) -> Responder {
        Responder::new(
            self.index.clone(),
            self.embedder.clone(),
            self.side_data.clone(),
            self.llm.clone(),
            ResponderOptions::from_settings(&self.settings),
        )
    }
}
