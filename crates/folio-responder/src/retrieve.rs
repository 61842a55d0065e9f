use anyhow::Result;

use folio_core::traits::{Embedder, VectorIndex};
use folio_core::types::SearchHit;

/// Separator placed between retrieved chunks in the grounding text.
pub const CHUNK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Default)]
pub struct RetrievalResult {
    pub hits: Vec<SearchHit>,
    pub grounding: String,
}

/// Embed `query` with the indexing embedder and join the top `k` chunks in
/// rank order. No hits is a valid result with an empty grounding. A blank
/// query is never embedded.
pub fn retrieve(query: &str, index: &dyn VectorIndex, embedder: &dyn Embedder, k: usize) -> Result<RetrievalResult> {
    if index.is_empty() || query.trim().is_empty() {
        return Ok(RetrievalResult::default());
    }
    let query_vec = embedder.embed(query)?;
    let hits = index.search(&query_vec, k)?;
    let grounding = hits.iter().map(|h| h.chunk.text.as_str()).collect::<Vec<_>>().join(CHUNK_SEPARATOR);
    tracing::debug!(
        hits = hits.len(),
        top_score = hits.first().map(|h| h.score),
        "retrieved grounding"
    );
    Ok(RetrievalResult { hits, grounding })
}
