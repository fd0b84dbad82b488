use crate::chunker::{DEFAULT_CHUNK_SIZE, chunk_text};
use crate::embed::Embedder;
use crate::error::{RagError, Result};
use crate::index::FlatIndex;

/// Chunks returned per question when no `k` is given.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalConfig {
    /// Words per chunk.
    pub chunk_size: usize,
    /// Chunks returned per question.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// A chunk selected for a question, with its position in the document and its distance.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub position: usize,
    pub distance: f32,
    pub content: String,
}

/// Finds the document chunks nearest to a question.
///
/// Holds no per-document state; every call re-chunks and re-embeds.
#[derive(Debug, Clone)]
pub struct Retriever<E> {
    embedder: E,
    config: RetrievalConfig,
}

impl<E: Embedder> Retriever<E> {
    #[must_use]
    pub fn new(embedder: E, config: RetrievalConfig) -> Self {
        Self { embedder, config }
    }

    #[must_use]
    pub fn config(&self) -> RetrievalConfig {
        self.config
    }

    /// Retrieve the configured `top_k` chunks of `document` nearest to `query`.
    ///
    /// # Errors
    ///
    /// See [`Retriever::retrieve_top`].
    pub async fn retrieve(&self, document: &str, query: &str) -> Result<Vec<RetrievedChunk>> {
        self.retrieve_top(document, query, self.config.top_k).await
    }

    /// Retrieve the `k` chunks of `document` nearest to `query`, nearest first.
    ///
    /// A document with no words returns an empty result without calling the embedder.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the embedder fails, or a count/dimension
    /// error if it returns malformed vectors.
    pub async fn retrieve_top(
        &self,
        document: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>> {
        let mut chunks = chunk_text(document, self.config.chunk_size);
        if chunks.is_empty() {
            tracing::debug!("document has no words, skipping retrieval");
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self
            .embedder
            .embed(&texts)
            .await
            .map_err(RagError::Embedding)?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingCount {
                expected: chunks.len(),
                actual: embeddings.len(),
            });
        }
        let index = FlatIndex::build(&embeddings)?;

        let query_vector = self
            .embedder
            .embed(&[query])
            .await
            .map_err(RagError::Embedding)?
            .into_iter()
            .next()
            .ok_or(RagError::EmbeddingCount {
                expected: 1,
                actual: 0,
            })?;

        let neighbors = index.search(&query_vector, k)?;
        tracing::debug!(
            chunks = chunks.len(),
            dimension = index.dimension(),
            k,
            hits = neighbors.len(),
            "retrieved document sections"
        );

        Ok(neighbors
            .into_iter()
            .map(|n| RetrievedChunk {
                position: n.position,
                distance: n.distance,
                content: std::mem::take(&mut chunks[n.position]),
            })
            .collect())
    }
}
