//! Configuration, wellness chat, image analysis, web search and the service
//! container that ties them to the document pipeline.

pub mod config;
pub mod guardrail;
pub mod mentor;
pub mod mood;
pub mod search;
pub mod vault;
pub mod vision;
pub mod wellness;

pub use config::Config;
pub use guardrail::{Guardrail, Scope};
pub use mentor::Mentor;
pub use mood::{Mood, analyze_mood};
pub use search::{HybridAnswer, HybridAnswerer, SearchError, SearchHit, SerperClient, WebSearch};
pub use vision::{ImageAnalyzer, VisionError};
pub use wellness::WellnessResponder;
