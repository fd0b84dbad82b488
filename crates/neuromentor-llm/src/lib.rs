//! Hosted LLM and embedding provider abstraction.

pub mod any;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
mod retry;

pub use error::LlmError;
pub use provider::{ImageData, LlmProvider, Message, Role};
