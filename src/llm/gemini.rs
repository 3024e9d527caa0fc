use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::core::errors::ApiError;

use super::provider::{ChatModel, Embedder};
use super::types::ChatRequest;

/// Google Gemini REST provider. Serves both chat completions
/// (`generateContent`) and question embeddings (`batchEmbedContents`).
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        chat_model: String,
        embedding_model: String,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model,
            embedding_model,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ChatModel for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, ApiError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.chat_model, self.api_key
        );

        let contents: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                json!({
                    // Gemini uses "model" rather than "assistant"
                    "role": if m.role == "assistant" { "model" } else { "user" },
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let mut body = json!({ "contents": contents });
        let mut generation_config = serde_json::Map::new();
        if let Some(t) = request.temperature {
            generation_config.insert("temperature".to_string(), json!(t));
        }
        if let Some(t) = request.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(t));
        }
        if !generation_config.is_empty() {
            if let Some(obj) = body.as_object_mut() {
                obj.insert(
                    "generationConfig".to_string(),
                    Value::Object(generation_config),
                );
            }
        }

        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Gemini chat error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let content = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl Embedder for GeminiProvider {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.base_url, self.embedding_model, self.api_key
        );

        let requests: Vec<Value> = inputs
            .iter()
            .map(|text| {
                json!({
                    "model": format!("models/{}", self.embedding_model),
                    "content": { "parts": [{ "text": text }] },
                })
            })
            .collect();

        let res = self
            .client
            .post(&url)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "Gemini embedding error ({}): {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let embeddings = payload
            .get("embeddings")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut vectors = Vec::with_capacity(embeddings.len());
        for embedding in embeddings {
            let values = embedding
                .get("values")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_f64())
                        .map(|v| v as f32)
                        .collect::<Vec<f32>>()
                })
                .unwrap_or_default();
            if values.is_empty() {
                return Err(ApiError::Internal(
                    "Gemini returned an empty embedding vector".to_string(),
                ));
            }
            vectors.push(values);
        }

        if vectors.len() != inputs.len() {
            return Err(ApiError::Internal(format!(
                "Gemini embedding count mismatch: {} != {}",
                vectors.len(),
                inputs.len()
            )));
        }

        Ok(vectors)
    }
}
