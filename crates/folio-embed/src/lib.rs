//! Embedding capability for the corpus indexer and the responder.
//!
//! Both sides must use the same embedder instance (or the same backend
//! configuration); vectors from different backends are not comparable.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use folio_core::config::{EmbeddingBackend, EmbeddingSettings};
use folio_core::traits::Embedder;

pub mod bert;
pub mod device;
pub mod hash;
pub mod pool;
pub mod tokenize;

pub use bert::BertEmbedder;
pub use hash::HashEmbedder;
pub use pool::masked_mean_l2;

/// Build the embedder selected by configuration. `model_dir` is the already
/// resolved checkpoint directory; it is ignored by the hash backend.
pub fn build_embedder(settings: &EmbeddingSettings, model_dir: &Path) -> Result<Arc<dyn Embedder>> {
    match settings.backend {
        EmbeddingBackend::Hash => {
            tracing::info!(dim = settings.hash_dim, "using hash embedder");
            Ok(Arc::new(HashEmbedder::new(settings.hash_dim)))
        }
        EmbeddingBackend::Bert => Ok(Arc::new(BertEmbedder::load(model_dir, settings.max_len, settings.device)?)),
    }
}
