pub mod gemini;
pub mod prompts;
pub mod provider;
pub mod types;

pub use gemini::GeminiProvider;
pub use provider::{ChatModel, Embedder};
pub use types::{ChatMessage, ChatRequest};
