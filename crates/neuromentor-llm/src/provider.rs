use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Raw image bytes attached to a message.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("data", &format_args!("<{} bytes>", self.data.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageData>,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: Vec::new(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            images: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageData) -> Self {
        self.images.push(image);
        self
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

pub(crate) fn has_images(messages: &[Message]) -> bool {
    messages.iter().any(Message::has_images)
}

/// A hosted text-generation and embedding backend.
///
/// Implementations are constructed once at startup and shared by reference;
/// every method takes `&self` and must be safe to call concurrently.
pub trait LlmProvider: Send + Sync {
    /// Send messages to the LLM and return the assistant response.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response is invalid.
    fn chat(&self, messages: &[Message]) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Single-shot completion: one user prompt in, trimmed text out.
    ///
    /// # Errors
    ///
    /// Propagates any [`LlmProvider::chat`] failure. A reply that is blank
    /// after trimming is [`LlmError::EmptyResponse`].
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send {
        self.complete_message(Message::user(prompt))
    }

    /// Like [`LlmProvider::complete`], for a prebuilt message such as one
    /// carrying images.
    ///
    /// # Errors
    ///
    /// Same as [`LlmProvider::complete`].
    fn complete_message(
        &self,
        message: Message,
    ) -> impl Future<Output = Result<String, LlmError>> + Send {
        async move {
            let reply = self.chat(std::slice::from_ref(&message)).await?;
            let reply = reply.trim();
            if reply.is_empty() {
                return Err(LlmError::EmptyResponse {
                    provider: self.name().to_owned(),
                });
            }
            Ok(reply.to_owned())
        }
    }

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::EmbedUnsupported`] when no embedding model is configured.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    /// Embed several texts, one vector per input in input order.
    ///
    /// The default issues one [`LlmProvider::embed`] call per text.
    ///
    /// # Errors
    ///
    /// Fails on the first embedding error.
    fn embed_batch(
        &self,
        texts: &[&str],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, LlmError>> + Send {
        async move {
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts {
                vectors.push(self.embed(text).await?);
            }
            Ok(vectors)
        }
    }

    fn supports_embeddings(&self) -> bool;

    fn name(&self) -> &str;
}
