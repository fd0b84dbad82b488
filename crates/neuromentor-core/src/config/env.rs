use std::fmt::Display;
use std::str::FromStr;

use super::Config;

/// Read and parse `key`, warning when the value is present but malformed.
fn parse_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("ignoring invalid {key} value {raw:?}: {e}");
            None
        }
    }
}

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_pipeline();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("NEUROMENTOR_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid NEUROMENTOR_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("NEUROMENTOR_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("NEUROMENTOR_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("NEUROMENTOR_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("NEUROMENTOR_LLM_VISION_MODEL") {
            self.llm.vision_model = Some(v);
        }
        if let Some(tokens) = parse_var::<u32>("NEUROMENTOR_LLM_MAX_TOKENS") {
            self.llm.max_tokens = tokens;
        }
        if let Some(t) = parse_var::<f32>("NEUROMENTOR_LLM_TEMPERATURE") {
            self.llm.temperature = t;
        }
    }

    fn apply_env_overrides_pipeline(&mut self) {
        if let Some(n) = parse_var::<usize>("NEUROMENTOR_RAG_CHUNK_SIZE") {
            self.rag.chunk_size = n;
        }
        if let Some(k) = parse_var::<usize>("NEUROMENTOR_RAG_TOP_K") {
            self.rag.top_k = k;
        }
        if let Some(bytes) = parse_var::<u64>("NEUROMENTOR_DOCUMENTS_MAX_FILE_SIZE") {
            self.documents.max_file_size = bytes;
        }
        if let Ok(v) = std::env::var("NEUROMENTOR_SEARCH_ENDPOINT") {
            self.search.endpoint = v;
        }
        if let Some(n) = parse_var::<usize>("NEUROMENTOR_SEARCH_MAX_RESULTS") {
            self.search.max_results = n;
        }
        if let Some(secs) = parse_var::<u64>("NEUROMENTOR_SEARCH_TIMEOUT") {
            self.search.timeout_seconds = secs;
        }
    }
}
