//! folio-index
//!
//! Corpus indexer: splits the résumé, embeds every chunk and builds the
//! in-memory nearest-neighbour index the responder searches. The index is
//! rebuilt at every startup and never mutated afterwards.

pub mod flat;
pub mod indexer;
pub mod null;

pub use flat::FlatIndex;
pub use indexer::{build_index, CorpusIndexer};
pub use null::NullIndex;
