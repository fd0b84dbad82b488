//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

/// Deterministic text-to-vector function used in place of a real embedding model.
pub type EmbedFn = fn(&str) -> Vec<f32>;

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recorded: Arc<Mutex<Vec<Vec<Message>>>>,
    embed_calls: Arc<Mutex<usize>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub embed_fn: Option<EmbedFn>,
    pub supports_embeddings: bool,
    pub fail_chat: bool,
    pub fail_embed: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            recorded: Arc::new(Mutex::new(Vec::new())),
            embed_calls: Arc::new(Mutex::new(0)),
            default_response: "mock response".into(),
            embedding: vec![0.0; 384],
            embed_fn: None,
            supports_embeddings: false,
            fail_chat: false,
            fail_embed: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            fail_embed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embed_fn(mut self, f: EmbedFn) -> Self {
        self.embed_fn = Some(f);
        self.supports_embeddings = true;
        self
    }

    #[must_use]
    pub fn with_failing_chat(mut self) -> Self {
        self.fail_chat = true;
        self
    }

    #[must_use]
    pub fn with_failing_embed(mut self) -> Self {
        self.fail_embed = true;
        self
    }

    /// Every message list passed to `chat`, in call order.
    #[must_use]
    pub fn recorded(&self) -> Vec<Vec<Message>> {
        self.recorded.lock().unwrap().clone()
    }

    /// The content of the last user message of the most recent `chat` call.
    #[must_use]
    pub fn last_prompt(&self) -> Option<String> {
        self.recorded
            .lock()
            .unwrap()
            .last()
            .and_then(|msgs| msgs.last())
            .map(|m| m.content.clone())
    }

    #[must_use]
    pub fn chat_calls(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    #[must_use]
    pub fn embed_calls(&self) -> usize {
        *self.embed_calls.lock().unwrap()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.recorded.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        *self.embed_calls.lock().unwrap() += 1;
        if self.fail_embed {
            return Err(LlmError::Other("mock embedding error".into()));
        }
        if !self.supports_embeddings {
            return Err(LlmError::EmbedUnsupported { provider: "mock" });
        }
        Ok(match self.embed_fn {
            Some(f) => f(text),
            None => self.embedding.clone(),
        })
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
