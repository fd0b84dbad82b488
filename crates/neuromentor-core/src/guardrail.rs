//! Topic gate for wellness chat.
//!
//! The model is asked for a one-word verdict. Anything other than a clear
//! `relevant`, including a failed call, is treated as off-topic.

use std::fmt;
use std::sync::Arc;

use neuromentor_llm::LlmProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Relevant,
    Irrelevant,
}

impl Scope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevant => "relevant",
            Self::Irrelevant => "irrelevant",
        }
    }

    #[must_use]
    pub fn is_relevant(self) -> bool {
        self == Self::Relevant
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Guardrail<P> {
    provider: Arc<P>,
}

impl<P> Clone for Guardrail<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: LlmProvider> Guardrail<P> {
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Decide whether `message` is about feelings, stress or personal challenges.
    pub async fn classify(&self, message: &str) -> Scope {
        let prompt = build_scope_prompt(message);
        match self.provider.complete(&prompt).await {
            Ok(reply) => {
                let scope = parse_scope(&reply);
                tracing::debug!(%scope, "guardrail verdict");
                scope
            }
            Err(e) => {
                tracing::warn!("guardrail check failed, treating message as off-topic: {e}");
                Scope::Irrelevant
            }
        }
    }
}

#[must_use]
pub fn build_scope_prompt(message: &str) -> String {
    format!(
        "You are a mental wellness assistant.\n\
         Please decide if the following message is related to feelings, stress, or personal challenges,\n\
         or if it's off-topic (like coding questions or sports news).\n\n\
         Just reply with one word: relevant or irrelevant.\n\n\
         Message: \"{}\"",
        message.trim()
    )
}

/// Only a first word of exactly `relevant` counts; `irrelevant` must not match.
#[must_use]
pub fn parse_scope(reply: &str) -> Scope {
    let first = reply
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if first == "relevant" {
        Scope::Relevant
    } else {
        Scope::Irrelevant
    }
}
