//! Live web search and search-grounded answers.

use std::fmt::{self, Write as _};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use neuromentor_llm::LlmProvider;
use serde::{Deserialize, Serialize};

use crate::vault::Secret;

pub const NO_RESULTS_MESSAGE: &str = "Couldn't find anything useful right now.";
pub const ANSWER_FAILED_MESSAGE: &str = "Oops, something went wrong while generating the answer.";

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search API returned status {status}")]
    Status { status: u16 },

    #[error("invalid search response: {0}")]
    Json(#[from] serde_json::Error),
}

/// One organic result. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

pub trait WebSearch: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`SearchError`] when the backend cannot be queried.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchHit>, SearchError>> + Send;
}

/// Client for the Serper Google-search API.
#[derive(Clone)]
pub struct SerperClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Secret,
}

impl fmt::Debug for SerperClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

impl SerperClient {
    #[must_use]
    pub fn new(api_key: Secret, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: neuromentor_llm::http::client_with_timeout(timeout),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl WebSearch for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", self.api_key.expose())
            .header("Content-Type", "application/json")
            .json(&SearchRequest { q: query })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::error!("search API error {status}: {text}");
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&text)?;
        tracing::debug!(hits = parsed.organic.len(), "web search complete");
        Ok(parsed.organic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridAnswer {
    pub answer: String,
    pub references: Vec<String>,
}

impl HybridAnswer {
    fn bare(answer: &str) -> Self {
        Self {
            answer: answer.to_owned(),
            references: Vec::new(),
        }
    }
}

/// Answers questions from the top web results plus one model call.
#[derive(Debug)]
pub struct HybridAnswerer<P, S> {
    provider: Arc<P>,
    search: S,
    max_results: usize,
}

impl<P: LlmProvider, S: WebSearch> HybridAnswerer<P, S> {
    #[must_use]
    pub fn new(provider: Arc<P>, search: S, max_results: usize) -> Self {
        Self {
            provider,
            search,
            max_results,
        }
    }

    /// Never fails; search and model errors become canned answers.
    pub async fn answer(&self, query: &str) -> HybridAnswer {
        let hits = match self.search.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("web search failed: {e}");
                Vec::new()
            }
        };
        if hits.is_empty() {
            return HybridAnswer::bare(NO_RESULTS_MESSAGE);
        }

        let mut context = String::new();
        let mut references = Vec::new();
        for hit in hits.iter().take(self.max_results) {
            if !hit.snippet.is_empty() {
                let _ = writeln!(context, "- {}", hit.snippet);
            }
            if !hit.link.is_empty() {
                references.push(hit.link.clone());
            }
        }

        match self.provider.complete(&build_hybrid_prompt(&context, query)).await {
            Ok(answer) => HybridAnswer { answer, references },
            Err(e) => {
                tracing::warn!("hybrid answer generation failed: {e}");
                HybridAnswer::bare(ANSWER_FAILED_MESSAGE)
            }
        }
    }
}

#[must_use]
pub fn build_hybrid_prompt(context: &str, query: &str) -> String {
    format!(
        "You are a helpful assistant.\n\
         Here is some web search context:\n\
         {context}\n\n\
         Based on this, answer the user's query in a clear, concise, and friendly way.\n\
         User's question: {query}\n\n\
         Answer:"
    )
}
