//! Per-query retrieval-augmented document question answering.
//!
//! ```text
//! document -> chunk_text -> Embedder -> FlatIndex
//!                                           |
//! query ----------------> Embedder -> search (top-k)
//!                                           |
//!                       AnswerComposer <- sections -> LlmProvider -> answer
//! ```
//!
//! Nothing is cached between calls: every question re-chunks, re-embeds and
//! rebuilds the index for the document it is asked about.

pub mod chunker;
pub mod composer;
pub mod document;
pub mod embed;
pub mod error;
pub mod index;
pub mod retriever;

pub use chunker::{DEFAULT_CHUNK_SIZE, chunk_text};
pub use composer::{AnswerComposer, NO_CONTENT_MESSAGE};
pub use embed::{Embedder, Embedding, ProviderEmbedder};
pub use error::RagError;
pub use index::{FlatIndex, Neighbor};
pub use retriever::{DEFAULT_TOP_K, RetrievalConfig, RetrievedChunk, Retriever};
