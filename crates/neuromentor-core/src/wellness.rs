use std::sync::Arc;

use neuromentor_llm::LlmProvider;

use crate::guardrail::Guardrail;

/// Reply for messages the guardrail rejects.
pub const OFF_TOPIC_MESSAGE: &str = "I'm here to support your mental wellness. Could you please tell me more about how you're feeling or ask a wellness-related question?";

/// Reply when the model cannot be reached.
pub const FALLBACK_MESSAGE: &str = "I'm here for you, but I'm having a little trouble understanding. Could you try asking that in another way?";

/// Gated, casual-toned wellness chat. Never fails: errors become gentle replies.
#[derive(Debug)]
pub struct WellnessResponder<P> {
    provider: Arc<P>,
    guardrail: Guardrail<P>,
}

impl<P: LlmProvider> WellnessResponder<P> {
    #[must_use]
    pub fn new(provider: Arc<P>, guardrail: Guardrail<P>) -> Self {
        Self {
            provider,
            guardrail,
        }
    }

    pub async fn respond(&self, message: &str) -> String {
        if !self.guardrail.classify(message).await.is_relevant() {
            return OFF_TOPIC_MESSAGE.to_owned();
        }

        match self.provider.complete(&build_chat_prompt(message)).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("wellness reply failed: {e}");
                FALLBACK_MESSAGE.to_owned()
            }
        }
    }
}

#[must_use]
pub fn build_chat_prompt(message: &str) -> String {
    format!(
        "Please answer like you're chatting on WhatsApp: casual, friendly, \
         and supportive with a natural tone. \
         Include any relevant emojis to add warmth when appropriate. \
         User's message: {message}\n\n\
         Response:"
    )
}
