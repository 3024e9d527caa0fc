use std::sync::Arc;

use crate::answer::{AnswerResult, AnswerSource};
use crate::llm::{prompts, ChatModel, ChatRequest};

use super::client::SearchClient;

/// Stage 2 of the cascade: live web search, domain-biased and filtered to
/// trusted sources. Constructed only when search credentials exist; an
/// unconfigured stage is represented by its absence in the cascade, so
/// skipping it performs zero external calls.
pub struct WebSearchFallback {
    client: Arc<dyn SearchClient>,
    summarizer: Arc<dyn ChatModel>,
    context_phrase: String,
    trusted_domains: Vec<String>,
    result_limit: usize,
}

impl WebSearchFallback {
    pub fn new(
        client: Arc<dyn SearchClient>,
        summarizer: Arc<dyn ChatModel>,
        context_phrase: String,
        trusted_domains: Vec<String>,
        result_limit: usize,
    ) -> Self {
        Self {
            client,
            summarizer,
            context_phrase,
            trusted_domains,
            result_limit,
        }
    }

    /// `None` is a miss, never a fault: provider outages and transport
    /// errors are absorbed here so the cascade can continue.
    pub async fn search_fallback(&self, query: &str) -> Option<AnswerResult> {
        // Bias the query toward the organization so callers don't need
        // domain knowledge to get relevant results.
        let biased_query = format!("{} {}", self.context_phrase, query);

        let response = match self.client.search(&biased_query, self.result_limit).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("web search failed, falling through: {}", err);
                return None;
            }
        };

        // Tier 1: direct answer box, snippets not consulted.
        if let Some(direct) = response.direct_answer {
            let direct = direct.trim();
            if !direct.is_empty() {
                return Some(AnswerResult::new(direct, AnswerSource::WebSearchAnswerBox));
            }
        }

        // Tier 2: summarize trusted snippets, API order preserved.
        let trusted: Vec<&str> = response
            .snippets
            .iter()
            .filter(|snippet| {
                self.trusted_domains
                    .iter()
                    .any(|domain| snippet.link.contains(domain))
            })
            .take(self.result_limit)
            .map(|snippet| snippet.text.as_str())
            .collect();

        if trusted.is_empty() {
            return None;
        }

        let combined = trusted.join("\n");
        let request = ChatRequest::prompt(prompts::snippet_summary_prompt(query, &combined));

        match self.summarizer.chat(request).await {
            Ok(summary) if !summary.trim().is_empty() => Some(AnswerResult::new(
                summary.trim(),
                AnswerSource::WebSearchSummary,
            )),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("snippet summarization failed, falling through: {}", err);
                None
            }
        }
    }
}
