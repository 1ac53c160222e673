/// A chunk of corpus text with its unit-length embedding
#[derive(Debug, Clone)]
struct IndexedChunk {
    text: String,
    vector: Vec<f32>,
}

/// One search hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

/// In-memory exact nearest-neighbour index (cosine similarity)
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: String, vector: Vec<f32>) {
        self.chunks.push(IndexedChunk {
            text,
            vector: normalize(vector),
        });
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top `k` chunks by similarity; equal scores keep insertion order
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let query = normalize(query.to_vec());

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .map(|chunk| ScoredChunk {
                text: chunk.text.clone(),
                score: chunk.vector.iter().zip(&query).map(|(a, b)| a * b).sum(),
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }
}
