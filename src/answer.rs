use serde::{Deserialize, Serialize};

/// Provenance tag: which cascade stage produced an answer. Persisted with
/// history messages and returned to the caller for display and audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Faq,
    WebSearchAnswerBox,
    WebSearchSummary,
    Llm,
    Error,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Faq => "faq",
            AnswerSource::WebSearchAnswerBox => "web_search_answer_box",
            AnswerSource::WebSearchSummary => "web_search_summary",
            AnswerSource::Llm => "llm",
            AnswerSource::Error => "error",
        }
    }
}

/// The sole output of the answer cascade: exactly one per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub content: String,
    pub source: AnswerSource,
}

impl AnswerResult {
    pub fn new(content: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            content: content.into(),
            source,
        }
    }
}
