use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;

use folio_core::document::load_document;
use folio_core::error::Error;
use folio_core::splitter::TextSplitter;
use folio_core::traits::{Embedder, VectorIndex};
use folio_core::types::{Chunk, Metric};

use crate::flat::FlatIndex;
use crate::null::NullIndex;

const EMBED_BATCH_SIZE: usize = 32;

/// One-shot startup transform: document → chunks → vectors → index.
pub struct CorpusIndexer {
    splitter: TextSplitter,
    embedder: Arc<dyn Embedder>,
    metric: Metric,
}

impl CorpusIndexer {
    pub fn new(splitter: TextSplitter, embedder: Arc<dyn Embedder>, metric: Metric) -> Self {
        Self { splitter, embedder, metric }
    }

    pub fn split(&self, document: &str) -> Vec<Chunk> {
        self.splitter.split(document)
    }

    pub fn embed_all(&self, chunks: Vec<Chunk>) -> Result<Vec<(Chunk, Vec<f32>)>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }
        let dim = self.embedder.dim();
        let pb = ProgressBar::new(chunks.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%)")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let mut vectors = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embedded = self.embedder.embed_batch(&texts)?;
            if embedded.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "embedder returned {} vectors for {} chunks",
                    embedded.len(),
                    batch.len()
                ))
                .into());
            }
            if let Some(bad) = embedded.iter().find(|v| v.len() != dim) {
                return Err(Error::DimensionMismatch { expected: dim, actual: bad.len() }.into());
            }
            vectors.extend(embedded);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        tracing::debug!(chunks = vectors.len(), dim, "embedded corpus");
        Ok(chunks.into_iter().zip(vectors).collect())
    }

    pub fn build_index(&self, pairs: Vec<(Chunk, Vec<f32>)>) -> Result<Arc<dyn VectorIndex>> {
        build_index(pairs, self.metric)
    }

    pub fn index_document(&self, document: &str) -> Result<Arc<dyn VectorIndex>> {
        let chunks = self.split(document);
        let count = chunks.len();
        let index = self.build_index(self.embed_all(chunks)?)?;
        tracing::info!(chunks = count, metric = ?self.metric, "corpus indexed");
        Ok(index)
    }

    /// Read and index the document at `path`. A missing file is fatal.
    pub fn index_file(&self, path: &Path) -> Result<Arc<dyn VectorIndex>> {
        let document = load_document(path)?;
        tracing::info!(path = %path.display(), bytes = document.len(), "loaded document");
        self.index_document(&document)
    }
}

/// `NullIndex` for an empty corpus, exact `FlatIndex` otherwise.
pub fn build_index(pairs: Vec<(Chunk, Vec<f32>)>, metric: Metric) -> Result<Arc<dyn VectorIndex>> {
    if pairs.is_empty() {
        tracing::warn!("no chunks to index; answers will have no grounding");
        return Ok(Arc::new(NullIndex));
    }
    Ok(Arc::new(FlatIndex::new(pairs, metric)?))
}
