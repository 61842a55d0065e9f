use folio_core::traits::VectorIndex;
use folio_core::types::SearchHit;

/// Stand-in used when the document produced no chunks. Every search is empty,
/// which the responder treats as "no grounding available".
#[derive(Debug, Default, Clone, Copy)]
pub struct NullIndex;

impl VectorIndex for NullIndex {
    fn len(&self) -> usize {
        0
    }

    fn search(&self, _query_vec: &[f32], _k: usize) -> anyhow::Result<Vec<SearchHit>> {
        Ok(Vec::new())
    }
}
