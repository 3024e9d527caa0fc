use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

/// One organic search result, in the order the API returned it.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSnippet {
    pub text: String,
    pub link: String,
}

/// Search response reduced to the two fields the fallback logic needs,
/// parsed once at this boundary so nothing downstream walks raw JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebSearchResponse {
    pub direct_answer: Option<String>,
    pub snippets: Vec<SearchSnippet>,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<WebSearchResponse, ApiError>;
}

/// Google Serper API client.
#[derive(Clone)]
pub struct SerperClient {
    api_key: String,
    country: String,
    language: String,
    client: Client,
}

impl SerperClient {
    pub fn new(api_key: String, country: String, language: String) -> Self {
        Self {
            api_key,
            country,
            language,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl SearchClient for SerperClient {
    async fn search(&self, query: &str, limit: usize) -> Result<WebSearchResponse, ApiError> {
        let body = json!({
            "q": query,
            "gl": self.country,
            "hl": self.language,
            "num": limit,
        });

        let response = self
            .client
            .post(SERPER_ENDPOINT)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !response.status().is_success() {
            return Err(ApiError::Internal(format!(
                "Serper search failed: {}",
                response.status()
            )));
        }

        let payload: Value = response.json().await.map_err(ApiError::internal)?;
        Ok(parse_serper_response(&payload))
    }
}

fn parse_serper_response(payload: &Value) -> WebSearchResponse {
    let direct_answer = payload
        .get("answerBox")
        .and_then(|answer_box| {
            answer_box
                .get("snippet")
                .or_else(|| answer_box.get("answer"))
        })
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty());

    let items = payload
        .get("organic")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut snippets = Vec::new();
    for item in items {
        let text = item
            .get("snippet")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let link = item
            .get("link")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        if !text.is_empty() && !link.is_empty() {
            snippets.push(SearchSnippet { text, link });
        }
    }

    WebSearchResponse {
        direct_answer,
        snippets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answer_box_preferring_snippet() {
        let payload = json!({
            "answerBox": { "answer": "short", "snippet": "Open 9am-5pm" },
            "organic": []
        });
        let parsed = parse_serper_response(&payload);
        assert_eq!(parsed.direct_answer.as_deref(), Some("Open 9am-5pm"));
    }

    #[test]
    fn parses_organic_results_in_order() {
        let payload = json!({
            "organic": [
                { "snippet": "first", "link": "https://a.example" },
                { "snippet": "second", "link": "https://b.example" },
                { "snippet": "", "link": "https://dropped.example" }
            ]
        });
        let parsed = parse_serper_response(&payload);
        assert!(parsed.direct_answer.is_none());
        assert_eq!(parsed.snippets.len(), 2);
        assert_eq!(parsed.snippets[0].text, "first");
        assert_eq!(parsed.snippets[1].link, "https://b.example");
    }

    #[test]
    fn empty_answer_box_text_is_not_a_direct_answer() {
        let payload = json!({ "answerBox": { "snippet": "  " } });
        assert!(parse_serper_response(&payload).direct_answer.is_none());
    }
}
