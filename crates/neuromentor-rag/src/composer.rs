use std::fmt::Write as _;
use std::sync::Arc;

use neuromentor_llm::LlmProvider;

use crate::embed::{Embedder, ProviderEmbedder};
use crate::error::{RagError, Result};
use crate::retriever::{RetrievalConfig, RetrievedChunk, Retriever};

/// Returned instead of calling the model when the document has no text.
pub const NO_CONTENT_MESSAGE: &str = "No content available in the document to answer from.";

const ANSWER_PREAMBLE: &str = "You are helping based on the following extracted document sections:";
const SUMMARY_INSTRUCTION: &str =
    "Summarize the following document clearly, concisely, and beautifully:";

/// Answers questions about a document by retrieving its nearest sections and
/// prompting the model with them.
#[derive(Debug)]
pub struct AnswerComposer<P, E> {
    provider: Arc<P>,
    retriever: Retriever<E>,
}

impl<P: LlmProvider> AnswerComposer<P, ProviderEmbedder<P>> {
    /// Composer that embeds through the same provider it generates with.
    #[must_use]
    pub fn from_provider(provider: Arc<P>, config: RetrievalConfig) -> Self {
        let embedder = ProviderEmbedder::new(Arc::clone(&provider));
        Self::new(provider, Retriever::new(embedder, config))
    }
}

impl<P: LlmProvider, E: Embedder> AnswerComposer<P, E> {
    #[must_use]
    pub fn new(provider: Arc<P>, retriever: Retriever<E>) -> Self {
        Self {
            provider,
            retriever,
        }
    }

    #[must_use]
    pub fn retriever(&self) -> &Retriever<E> {
        &self.retriever
    }

    /// Answer `query` from the configured number of nearest sections of `document`.
    ///
    /// # Errors
    ///
    /// Embedding, index and model failures are returned unchanged.
    pub async fn compose_answer(&self, document: &str, query: &str) -> Result<String> {
        self.compose_answer_with_k(document, query, self.retriever.config().top_k)
            .await
    }

    /// Answer `query` from the `k` nearest sections of `document`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ZeroTopK`] for `k == 0`. Embedding, index and model
    /// failures are returned unchanged, including a blank model reply.
    pub async fn compose_answer_with_k(
        &self,
        document: &str,
        query: &str,
        k: usize,
    ) -> Result<String> {
        if k == 0 {
            return Err(RagError::ZeroTopK);
        }
        let sections = self.retriever.retrieve_top(document, query, k).await?;
        if sections.is_empty() {
            return Ok(NO_CONTENT_MESSAGE.to_owned());
        }

        let prompt = build_answer_prompt(&sections, query);
        tracing::debug!(
            sections = sections.len(),
            prompt_len = prompt.len(),
            "composing answer"
        );
        self.provider
            .complete(&prompt)
            .await
            .map_err(RagError::Model)
    }

    /// Summarize the whole of `document` in one model call.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Model`] if the model call fails or replies with
    /// nothing but whitespace.
    pub async fn summarize(&self, document: &str) -> Result<String> {
        if document.trim().is_empty() {
            return Ok(NO_CONTENT_MESSAGE.to_owned());
        }
        let prompt = build_summary_prompt(document);
        tracing::debug!(prompt_len = prompt.len(), "summarizing document");
        self.provider
            .complete(&prompt)
            .await
            .map_err(RagError::Model)
    }
}

/// Sections are numbered from 1 in retrieval order.
#[must_use]
pub fn build_answer_prompt(sections: &[RetrievedChunk], query: &str) -> String {
    let mut prompt = String::from(ANSWER_PREAMBLE);
    prompt.push_str("\n\n");
    for (i, section) in sections.iter().enumerate() {
        let _ = write!(prompt, "Section {}:\n{}\n\n", i + 1, section.content);
    }
    let _ = write!(
        prompt,
        "Now answer the user's question clearly:\nQuestion: {query}\nAnswer:"
    );
    prompt
}

#[must_use]
pub fn build_summary_prompt(document: &str) -> String {
    format!("{SUMMARY_INSTRUCTION}\n\n{document}\n\nSummary:")
}

#[cfg(test)]
mod tests {
    use neuromentor_llm::LlmError;
    use neuromentor_llm::mock::MockProvider;

    use super::*;
    use crate::retriever::tests::{KeywordEmbedder, keyword_vector};

    fn section(position: usize, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            position,
            distance: 0.0,
            content: content.into(),
        }
    }

    fn composer(provider: MockProvider, chunk_size: usize) -> AnswerComposer<MockProvider, KeywordEmbedder> {
        AnswerComposer::new(
            Arc::new(provider),
            Retriever::new(
                KeywordEmbedder::default(),
                RetrievalConfig {
                    chunk_size,
                    top_k: 1,
                },
            ),
        )
    }

    #[test]
    fn answer_prompt_layout() {
        let prompt = build_answer_prompt(&[section(4, "alpha"), section(0, "beta")], "why?");
        assert_eq!(
            prompt,
            "You are helping based on the following extracted document sections:\n\n\
             Section 1:\nalpha\n\n\
             Section 2:\nbeta\n\n\
             Now answer the user's question clearly:\nQuestion: why?\nAnswer:"
        );
    }

    #[test]
    fn summary_prompt_layout() {
        let prompt = build_summary_prompt("body text");
        assert!(prompt.starts_with(SUMMARY_INSTRUCTION));
        assert!(prompt.contains("\n\nbody text\n\n"));
        assert!(prompt.ends_with("Summary:"));
    }

    #[tokio::test]
    async fn answer_uses_nearest_section_and_trims_reply() {
        let provider = MockProvider::with_responses(vec!["  The cat slept.  \n".into()]);
        let c = composer(provider, 3);
        let answer = c
            .compose_answer("dog dog dog cat cat cat", "what about the cat")
            .await
            .unwrap();
        assert_eq!(answer, "The cat slept.");

        let prompt = c.provider.last_prompt().unwrap();
        assert!(prompt.contains("Section 1:\ncat cat cat\n"));
        assert!(!prompt.contains("Section 2:"));
        assert!(prompt.contains("Question: what about the cat\nAnswer:"));
    }

    #[tokio::test]
    async fn explicit_k_overrides_config() {
        let c = composer(MockProvider::default(), 1);
        c.compose_answer_with_k("cat dog cat", "cat", 3).await.unwrap();
        let prompt = c.provider.last_prompt().unwrap();
        assert!(prompt.contains("Section 3:\ndog\n"));
    }

    #[tokio::test]
    async fn empty_document_answers_without_model() {
        let c = composer(MockProvider::default(), 300);
        let answer = c.compose_answer("", "anything").await.unwrap();
        assert_eq!(answer, NO_CONTENT_MESSAGE);
        assert_eq!(c.provider.chat_calls(), 0);
    }

    #[tokio::test]
    async fn zero_k_is_rejected_before_any_work() {
        let c = composer(MockProvider::default(), 1);
        let err = c.compose_answer_with_k("cat dog cat", "cat", 0).await.unwrap_err();
        assert!(matches!(err, RagError::ZeroTopK));
        assert_eq!(c.provider.chat_calls(), 0);
    }

    #[tokio::test]
    async fn blank_model_reply_is_an_error() {
        let c = composer(MockProvider::with_responses(vec!["   \n ".into()]), 300);
        let err = c.compose_answer("cat sat", "cat").await.unwrap_err();
        assert!(matches!(err, RagError::Model(LlmError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn blank_summary_is_an_error() {
        let c = composer(MockProvider::with_responses(vec!["\t\n".into()]), 300);
        let err = c.summarize("some text").await.unwrap_err();
        assert!(matches!(err, RagError::Model(LlmError::EmptyResponse { .. })));
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let c = composer(MockProvider::default().with_failing_chat(), 300);
        let err = c.compose_answer("cat", "cat").await.unwrap_err();
        assert!(matches!(err, RagError::Model(_)));
    }

    #[tokio::test]
    async fn embedding_failure_skips_model() {
        let provider = Arc::new(MockProvider::default().with_failing_embed());
        let c = AnswerComposer::from_provider(Arc::clone(&provider), RetrievalConfig::default());
        let err = c.compose_answer("some words", "q").await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
        assert_eq!(provider.chat_calls(), 0);
    }

    #[tokio::test]
    async fn from_provider_embeds_through_provider() {
        let provider = Arc::new(MockProvider::default().with_embed_fn(keyword_vector));
        let c = AnswerComposer::from_provider(
            Arc::clone(&provider),
            RetrievalConfig {
                chunk_size: 2,
                top_k: 1,
            },
        );
        c.compose_answer("dog dog cat cat", "cat").await.unwrap();
        // two chunks plus the query
        assert_eq!(provider.embed_calls(), 3);
        assert!(provider.last_prompt().unwrap().contains("Section 1:\ncat cat\n"));
    }

    #[tokio::test]
    async fn summarize_sends_whole_document() {
        let c = composer(MockProvider::with_responses(vec![" short ".into()]), 1);
        let summary = c.summarize("first line\nsecond line").await.unwrap();
        assert_eq!(summary, "short");
        let prompt = c.provider.last_prompt().unwrap();
        assert!(prompt.contains("first line\nsecond line"));
    }

    #[tokio::test]
    async fn summarize_blank_document_skips_model() {
        let c = composer(MockProvider::default(), 300);
        assert_eq!(c.summarize(" \n\t ").await.unwrap(), NO_CONTENT_MESSAGE);
        assert_eq!(c.provider.chat_calls(), 0);
    }

    #[tokio::test]
    async fn summarize_failure_is_model_error() {
        let c = composer(MockProvider::failing(), 300);
        assert!(matches!(
            c.summarize("text").await.unwrap_err(),
            RagError::Model(_)
        ));
    }
}
