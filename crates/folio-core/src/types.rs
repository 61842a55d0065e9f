//! Domain types shared by the indexer and the responder.

use serde::{Deserialize, Serialize};

/// A contiguous slice of the source document that is independently embedded.
///
/// - `index`: position in the chunk sequence produced by the splitter
/// - `text`: the chunk payload, trimmed of surrounding whitespace
/// - `start_offset`: byte offset of `text` in the original document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub start_offset: usize,
}

/// Similarity policy used by the vector index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Cosine,
    L2,
}

/// The minimal surface returned by an index search.
///
/// `score` is metric-specific but higher is always better: cosine similarity,
/// or the negated euclidean distance for `Metric::L2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk: Chunk,
    pub score: f32,
}

/// A publication record injected into the grounding by keyword triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub link: String,
}
