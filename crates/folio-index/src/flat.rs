use anyhow::Result;

use folio_core::error::Error;
use folio_core::traits::VectorIndex;
use folio_core::types::{Chunk, Metric, SearchHit};

/// Exact brute-force index. Every search scores all entries, which is the
/// right trade-off for a single résumé worth of chunks.
pub struct FlatIndex {
    entries: Vec<Entry>,
    dim: usize,
    metric: Metric,
}

struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
    norm: f32,
}

impl FlatIndex {
    /// Build from embedded chunks. All vectors must share one dimension.
    pub fn new(pairs: Vec<(Chunk, Vec<f32>)>, metric: Metric) -> Result<Self> {
        let dim = pairs.first().map_or(0, |(_, v)| v.len());
        let mut entries = Vec::with_capacity(pairs.len());
        for (chunk, vector) in pairs {
            if vector.len() != dim {
                return Err(Error::DimensionMismatch { expected: dim, actual: vector.len() }.into());
            }
            let norm = l2_norm(&vector);
            entries.push(Entry { chunk, vector, norm });
        }
        Ok(Self { entries, dim, metric })
    }

    fn score(&self, entry: &Entry, query: &[f32], query_norm: f32) -> f32 {
        match self.metric {
            Metric::Cosine => {
                if entry.norm == 0.0 || query_norm == 0.0 {
                    return 0.0;
                }
                dot(&entry.vector, query) / (entry.norm * query_norm)
            }
            Metric::L2 => -entry
                .vector
                .iter()
                .zip(query)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f32>()
                .sqrt(),
        }
    }
}

impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query_vec.len() != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual: query_vec.len() }.into());
        }
        let query_norm = l2_norm(query_vec);
        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|e| SearchHit { chunk: e.chunk.clone(), score: self.score(e, query_vec, query_norm) })
            .collect();
        // Stable sort: equal scores keep chunk order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt()
}
