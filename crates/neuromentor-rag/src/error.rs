use neuromentor_llm::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("embedding failed: {0}")]
    Embedding(#[source] LlmError),

    #[error("language model call failed: {0}")]
    Model(#[source] LlmError),

    #[error("embedder returned {actual} vectors for {expected} inputs")]
    EmbeddingCount { expected: usize, actual: usize },

    #[error("at least one section must be requested")]
    ZeroTopK,

    #[error("vector dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, RagError>;
