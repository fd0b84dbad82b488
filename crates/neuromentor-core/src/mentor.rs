//! Process-wide service container.
//!
//! Built once at startup from [`Config`] and a provider, then shared by
//! reference. Every capability borrows the same `Arc<P>`, so one model client
//! serves retrieval, chat, classification, image analysis and web answers.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use neuromentor_llm::LlmProvider;
use neuromentor_rag::document::{self, DocumentError};
use neuromentor_rag::{AnswerComposer, ProviderEmbedder, RagError, RetrievalConfig};

use crate::config::Config;
use crate::guardrail::{Guardrail, Scope};
use crate::search::{HybridAnswer, HybridAnswerer, SerperClient, WebSearch};
use crate::vision::{ImageAnalyzer, VisionError};
use crate::wellness::WellnessResponder;

pub struct Mentor<P, S = SerperClient> {
    provider: Arc<P>,
    composer: AnswerComposer<P, ProviderEmbedder<P>>,
    guardrail: Guardrail<P>,
    wellness: WellnessResponder<P>,
    vision: ImageAnalyzer<P>,
    web: Option<HybridAnswerer<P, S>>,
    max_file_size: u64,
}

impl<P: LlmProvider> Mentor<P, SerperClient> {
    /// Wire every service from `config`. Web search is enabled only when a
    /// Serper key was resolved.
    #[must_use]
    pub fn from_config(provider: Arc<P>, config: &Config) -> Self {
        let mut mentor = Self::new(provider, config.rag.retrieval(), config.documents.max_file_size);
        if let Some(key) = config.secrets.serper_api_key.clone() {
            let client = SerperClient::new(
                key,
                config.search.endpoint.clone(),
                Duration::from_secs(config.search.timeout_seconds),
            );
            mentor.web = Some(HybridAnswerer::new(
                Arc::clone(&mentor.provider),
                client,
                config.search.max_results,
            ));
        } else {
            tracing::debug!("no search API key configured, web answers disabled");
        }
        mentor
    }
}

impl<P: LlmProvider, S: WebSearch> Mentor<P, S> {
    #[must_use]
    pub fn new(provider: Arc<P>, retrieval: RetrievalConfig, max_file_size: u64) -> Self {
        let guardrail = Guardrail::new(Arc::clone(&provider));
        Self {
            composer: AnswerComposer::from_provider(Arc::clone(&provider), retrieval),
            wellness: WellnessResponder::new(Arc::clone(&provider), guardrail.clone()),
            vision: ImageAnalyzer::new(Arc::clone(&provider), max_file_size),
            guardrail,
            web: None,
            max_file_size,
            provider,
        }
    }

    /// Replace the web search backend.
    #[must_use]
    pub fn with_web_search<T: WebSearch>(self, search: T, max_results: usize) -> Mentor<P, T> {
        Mentor {
            web: Some(HybridAnswerer::new(
                Arc::clone(&self.provider),
                search,
                max_results,
            )),
            provider: self.provider,
            composer: self.composer,
            guardrail: self.guardrail,
            wellness: self.wellness,
            vision: self.vision,
            max_file_size: self.max_file_size,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn has_web_search(&self) -> bool {
        self.web.is_some()
    }

    /// Load `paths` in order and merge them into one document text.
    ///
    /// # Errors
    ///
    /// Returns the first load failure.
    pub async fn load_files(&self, paths: &[impl AsRef<Path>]) -> Result<String, DocumentError> {
        let documents = document::load_documents(paths, self.max_file_size).await?;
        Ok(document::merge_texts(&documents))
    }

    /// # Errors
    ///
    /// Embedding and model failures are returned for the caller to render.
    pub async fn ask_document(&self, document: &str, question: &str) -> Result<String, RagError> {
        self.composer.compose_answer(document, question).await
    }

    /// # Errors
    ///
    /// Embedding and model failures are returned for the caller to render.
    pub async fn ask_document_top(
        &self,
        document: &str,
        question: &str,
        k: NonZeroUsize,
    ) -> Result<String, RagError> {
        self.composer
            .compose_answer_with_k(document, question, k.get())
            .await
    }

    /// # Errors
    ///
    /// Returns [`RagError::Model`] if the model call fails.
    pub async fn summarize_document(&self, document: &str) -> Result<String, RagError> {
        self.composer.summarize(document).await
    }

    pub async fn chat(&self, message: &str) -> String {
        self.wellness.respond(message).await
    }

    pub async fn classify(&self, message: &str) -> Scope {
        self.guardrail.classify(message).await
    }

    /// Describe the emotional atmosphere of a jpg/jpeg/png file.
    ///
    /// # Errors
    ///
    /// Load and model failures are returned for the caller to render.
    pub async fn analyze_image(&self, path: &Path) -> Result<String, VisionError> {
        self.vision.analyze_file(path).await
    }

    /// `None` when no search backend is configured.
    pub async fn web_answer(&self, query: &str) -> Option<HybridAnswer> {
        match &self.web {
            Some(web) => Some(web.answer(query).await),
            None => None,
        }
    }
}
