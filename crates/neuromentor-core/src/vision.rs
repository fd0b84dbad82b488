//! Emotional-context description of uploaded images.

use std::path::Path;
use std::sync::Arc;

use neuromentor_llm::{ImageData, LlmError, LlmProvider, Message};
use neuromentor_rag::document::{self, DocumentError};

/// Instruction sent alongside every image.
pub const EMOTION_PROMPT: &str = "Analyze this image purely based on its emotional context. \
     Focus only on the emotions it conveys. Do not suggest improvements, feedback, or modifications. \
     Just describe the emotional atmosphere you perceive.";

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("failed to load image: {0}")]
    Load(#[from] DocumentError),

    #[error("image analysis failed: {0}")]
    Model(#[from] LlmError),
}

/// Describes the emotional atmosphere of an image with the provider's vision model.
#[derive(Debug)]
pub struct ImageAnalyzer<P> {
    provider: Arc<P>,
    max_file_size: u64,
}

impl<P: LlmProvider> ImageAnalyzer<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, max_file_size: u64) -> Self {
        Self {
            provider,
            max_file_size,
        }
    }

    /// # Errors
    ///
    /// Returns [`VisionError::Load`] for unreadable, oversized or non-image
    /// files and [`VisionError::Model`] when the model fails or replies blank.
    pub async fn analyze_file(&self, path: &Path) -> Result<String, VisionError> {
        let image = document::load_image(path, self.max_file_size).await?;
        self.analyze(image).await
    }

    /// # Errors
    ///
    /// Returns [`VisionError::Model`] when the model fails or replies blank.
    pub async fn analyze(&self, image: ImageData) -> Result<String, VisionError> {
        tracing::debug!(
            mime_type = %image.mime_type,
            bytes = image.data.len(),
            "analyzing image"
        );
        let message = Message::user(EMOTION_PROMPT).with_image(image);
        Ok(self.provider.complete_message(message).await?)
    }
}
