use serde::{Deserialize, Serialize};

use neuromentor_rag::RetrievalConfig;
use neuromentor_rag::document::DEFAULT_MAX_FILE_SIZE;

use crate::vault::Secret;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AssistantConfig {
    #[serde(default = "default_assistant_name")]
    pub name: String,
}

fn default_assistant_name() -> String {
    "NeuroMentor".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
        }
    }
}

/// LLM provider backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    /// Any OpenAI-compatible endpoint, including Gemini's.
    OpenAi,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    pub provider: ProviderKind,
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Model for image analysis; the chat model is used when unset.
    #[serde(default)]
    pub vision_model: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_embedding_model() -> String {
    "nomic-embed-text".into()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.6
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            base_url: "http://localhost:11434".into(),
            model: "mistral:7b".into(),
            embedding_model: default_embedding_model(),
            vision_model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RagConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_chunk_size() -> usize {
    neuromentor_rag::DEFAULT_CHUNK_SIZE
}

fn default_top_k() -> usize {
    neuromentor_rag::DEFAULT_TOP_K
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            top_k: default_top_k(),
        }
    }
}

impl RagConfig {
    #[must_use]
    pub fn retrieval(&self) -> RetrievalConfig {
        RetrievalConfig {
            chunk_size: self.chunk_size,
            top_k: self.top_k,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DocumentsConfig {
    /// Files above this many bytes are rejected before reading.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u64,
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".into()
}

fn default_max_results() -> usize {
    3
}

fn default_search_timeout() -> u64 {
    15
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            max_results: default_max_results(),
            timeout_seconds: default_search_timeout(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub llm_api_key: Option<Secret>,
    pub serper_api_key: Option<Secret>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_serde_names() {
        let kind: ProviderKind = toml::from_str::<LlmConfig>(
            "provider = \"openai\"\nbase_url = \"u\"\nmodel = \"m\"",
        )
        .unwrap()
        .provider;
        assert_eq!(kind, ProviderKind::OpenAi);
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
        assert_eq!(ProviderKind::Ollama.as_str(), "ollama");
    }

    #[test]
    fn rag_config_maps_to_retrieval() {
        let rag = RagConfig {
            chunk_size: 120,
            top_k: 5,
        };
        let retrieval = rag.retrieval();
        assert_eq!(retrieval.chunk_size, 120);
        assert_eq!(retrieval.top_k, 5);
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = Config::default();
        config.secrets.llm_api_key = Some(Secret::new("sk-hidden"));
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-hidden"));
        assert!(rendered.contains("[rag]"));
    }
}
