use async_trait::async_trait;

use crate::core::errors::ApiError;

use super::types::ChatRequest;

/// Chat-completion seam. Production implementation is `GeminiProvider`;
/// tests substitute deterministic stubs.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError>;
}

/// Text-embedding seam used by both the offline index builder and the
/// query-time resolver. Must map identical inputs to identical vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// embed a batch of texts into fixed-length vectors
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}
