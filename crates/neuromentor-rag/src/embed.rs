use std::future::Future;
use std::sync::Arc;

use neuromentor_llm::{LlmError, LlmProvider};

/// A fixed-dimension vector; the dimension is a property of the embedding model.
pub type Embedding = Vec<f32>;

/// Maps texts to embeddings, one vector per input in input order.
pub trait Embedder: Send + Sync {
    /// # Errors
    ///
    /// Propagates the embedding backend's failure unchanged.
    fn embed(&self, texts: &[&str]) -> impl Future<Output = Result<Vec<Embedding>, LlmError>> + Send;
}

/// Uses an [`LlmProvider`]'s embedding endpoint as the [`Embedder`].
#[derive(Debug)]
pub struct ProviderEmbedder<P> {
    provider: Arc<P>,
}

impl<P> ProviderEmbedder<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P> Clone for ProviderEmbedder<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: LlmProvider> Embedder for ProviderEmbedder<P> {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, LlmError> {
        self.provider.embed_batch(texts).await
    }
}
