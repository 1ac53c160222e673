//! Text embedding providers.

use crate::error::AssistantResult;
use async_trait::async_trait;

/// Turns text into fixed-size vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input
    async fn embed(&self, texts: &[String]) -> AssistantResult<Vec<Vec<f32>>>;

    /// Length of every returned vector
    fn dimension(&self) -> usize;

    /// Largest batch `embed` accepts
    fn max_batch_size(&self) -> usize {
        64
    }
}

/// Bag-of-words embedder using the hashing trick
///
/// Lower-cased alphanumeric tokens are hashed (FNV-1a) into `dimension`
/// signed buckets. Deterministic and dependency-free, so it is the default
/// when no model is compiled in.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(&token.to_lowercase());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        vector
    }
}

fn fnv1a(text: &str) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    text.bytes()
        .fold(OFFSET, |hash, byte| (hash ^ byte as u64).wrapping_mul(PRIME))
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> AssistantResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(feature = "local-embeddings")]
pub use local::FastEmbedder;

#[cfg(feature = "local-embeddings")]
mod local {
    use super::Embedder;
    use crate::error::{embedding_error, AssistantResult};
    use async_trait::async_trait;
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Sentence embeddings from a local ONNX model via fastembed
    pub struct FastEmbedder {
        model: Arc<Mutex<TextEmbedding>>,
        dimension: usize,
    }

    impl FastEmbedder {
        pub fn new(model_name: &str) -> AssistantResult<Self> {
            let (model, dimension) = match model_name {
                "sentence-transformers/all-MiniLM-L6-v2" | "all-MiniLM-L6-v2" => {
                    (EmbeddingModel::AllMiniLML6V2, 384)
                }
                "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => {
                    (EmbeddingModel::BGESmallENV15, 384)
                }
                "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => {
                    (EmbeddingModel::BGEBaseENV15, 768)
                }
                other => {
                    return Err(embedding_error(&format!(
                        "Unknown model: {}. Supported: all-MiniLM-L6-v2, bge-small-en-v1.5, bge-base-en-v1.5",
                        other
                    )))
                }
            };

            let options = InitOptions::new(model).with_show_download_progress(true);
            let text_model = TextEmbedding::try_new(options)
                .map_err(|e| embedding_error(&format!("{}: {}", model_name, e)))?;

            Ok(Self {
                model: Arc::new(Mutex::new(text_model)),
                dimension,
            })
        }
    }

    #[async_trait]
    impl Embedder for FastEmbedder {
        async fn embed(&self, texts: &[String]) -> AssistantResult<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(vec![]);
            }

            let texts = texts.to_vec();
            let model = self.model.clone();

            // fastembed is synchronous
            tokio::task::spawn_blocking(move || {
                let mut model = model.blocking_lock();
                model.embed(texts, None)
            })
            .await
            .map_err(|e| embedding_error(&format!("Task join error: {}", e)))?
            .map_err(|e| embedding_error(&format!("Embedding failed: {}", e)))
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn max_batch_size(&self) -> usize {
            32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashing_is_deterministic_and_case_insensitive() {
        let embedder = HashingEmbedder::new(64);
        let vectors = embedder
            .embed(&["Calendar Events".to_string(), "calendar events".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].len(), 64);
        assert_eq!(vectors[0], vectors[1]);
    }

    #[tokio::test]
    async fn text_without_tokens_is_the_zero_vector() {
        let embedder = HashingEmbedder::default();
        let vectors = embedder.embed(&["?! ...".to_string()]).await.unwrap();
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }
}
