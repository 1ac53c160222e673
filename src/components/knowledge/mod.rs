pub mod chunker;
pub mod embedding;
mod index;

pub use chunker::ChunkConfig;
pub use embedding::{Embedder, HashingEmbedder};
pub use index::{ScoredChunk, VectorIndex};

use crate::config::Config;
use crate::error::{embedding_error, knowledge_error, AssistantResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Similarity search over a corpus indexed once at startup
pub struct KnowledgeRetriever {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl KnowledgeRetriever {
    /// Read, chunk and embed the corpus at `path`
    ///
    /// A missing, unreadable or empty corpus is an error; there is no
    /// partial index.
    pub async fn build(
        path: &Path,
        chunk_config: ChunkConfig,
        embedder: Arc<dyn Embedder>,
    ) -> AssistantResult<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            knowledge_error(&format!(
                "Failed to read knowledge base {}: {}",
                path.display(),
                e
            ))
        })?;

        let chunks = chunker::split_text(&text, &chunk_config);
        if chunks.is_empty() {
            return Err(knowledge_error(&format!(
                "Knowledge base {} contains no text",
                path.display()
            )));
        }

        let mut index = VectorIndex::new();
        for batch in chunks.chunks(embedder.max_batch_size().max(1)) {
            let vectors = embedder.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(embedding_error(&format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }
            if let Some(bad) = vectors.iter().find(|v| v.len() != embedder.dimension()) {
                return Err(embedding_error(&format!(
                    "Expected {}-dimensional embeddings, got {}",
                    embedder.dimension(),
                    bad.len()
                )));
            }
            for (text, vector) in batch.iter().zip(vectors) {
                index.insert(text.clone(), vector);
            }
        }

        info!("Indexed {} chunks from {}", index.len(), path.display());

        Ok(Self { index, embedder })
    }

    /// Build from the configured corpus and chunking settings
    pub async fn from_config(
        config: &Config,
        embedder: Arc<dyn Embedder>,
    ) -> AssistantResult<Self> {
        let chunk_config = ChunkConfig {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
        };
        Self::build(&config.knowledge_base_path, chunk_config, embedder).await
    }

    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Top `k` chunks with their similarity scores
    pub async fn search(&self, query: &str, k: usize) -> AssistantResult<Vec<ScoredChunk>> {
        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| embedding_error("No embedding returned for query"))?;

        let hits = self.index.search(&query_vector, k);
        debug!(
            "Retrieved {} chunks, best score {:?}",
            hits.len(),
            hits.first().map(|h| h.score)
        );
        Ok(hits)
    }

    /// Top `k` chunk texts for a query
    pub async fn retrieve_context(&self, query: &str, k: usize) -> AssistantResult<Vec<String>> {
        Ok(self
            .search(query, k)
            .await?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }
}

/// The embedder selected at compile time
#[cfg(feature = "local-embeddings")]
pub fn default_embedder(config: &Config) -> AssistantResult<Arc<dyn Embedder>> {
    Ok(Arc::new(embedding::FastEmbedder::new(&config.embedding_model)?))
}

/// The embedder selected at compile time
#[cfg(not(feature = "local-embeddings"))]
pub fn default_embedder(config: &Config) -> AssistantResult<Arc<dyn Embedder>> {
    debug!(
        "Built without local-embeddings, ignoring model {}",
        config.embedding_model
    );
    Ok(Arc::new(HashingEmbedder::default()))
}
