//! Answer cascade: FAQ → web search → generative model.
//!
//! Strictly linear `Start → TryFaq → TryWeb → TryLlm → Done` state
//! machine. A stage returning `None` advances to the next state; a stage
//! producing a result jumps straight to `Done`. The generative stage is
//! unconditional and terminal, so every query reaches `Done` with exactly
//! one well-formed [`AnswerResult`]. The ordering is a fixed cost/quality
//! trade-off: curated FAQ first, trusted live search second, open
//! completion last.

use std::sync::Arc;

use crate::answer::{AnswerResult, AnswerSource};
use crate::faq::FaqResolver;
use crate::llm::{prompts, ChatModel, ChatRequest};
use crate::search::WebSearchFallback;

/// Fixed user-facing text for the one failure mode that cannot fall
/// through any further.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, something went wrong while answering your question. Please try again later.";

enum Stage {
    Start,
    TryFaq,
    TryWeb,
    TryLlm,
    Done(AnswerResult),
}

/// The single entry point the presentation layer calls. Holds only
/// read-only shared state; concurrent queries are independent.
pub struct AnswerCascade {
    resolver: FaqResolver,
    web: Option<WebSearchFallback>,
    generator: Arc<dyn ChatModel>,
}

impl AnswerCascade {
    /// `web` is `None` when no search credentials are configured; the
    /// cascade then skips that stage without any side effects.
    pub fn new(
        resolver: FaqResolver,
        web: Option<WebSearchFallback>,
        generator: Arc<dyn ChatModel>,
    ) -> Self {
        Self {
            resolver,
            web,
            generator,
        }
    }

    pub async fn answer(&self, query: &str) -> AnswerResult {
        let mut stage = Stage::Start;

        loop {
            stage = match stage {
                Stage::Start => Stage::TryFaq,
                Stage::TryFaq => match self.resolver.resolve(query).await {
                    Some(result) => Stage::Done(result),
                    None => Stage::TryWeb,
                },
                Stage::TryWeb => {
                    let result = match &self.web {
                        Some(web) => web.search_fallback(query).await,
                        None => None,
                    };
                    match result {
                        Some(result) => Stage::Done(result),
                        None => Stage::TryLlm,
                    }
                }
                Stage::TryLlm => Stage::Done(self.llm_fallback(query).await),
                Stage::Done(result) => {
                    tracing::info!(source = result.source.as_str(), "query answered");
                    return result;
                }
            };
        }
    }

    /// Terminal stage: always produces a result. This is the only place
    /// allowed to emit the `error` source, and no provider failure
    /// escapes it.
    async fn llm_fallback(&self, query: &str) -> AnswerResult {
        let request = ChatRequest::prompt(prompts::general_fallback_prompt(query));

        match self.generator.chat(request).await {
            Ok(content) if !content.trim().is_empty() => {
                AnswerResult::new(content.trim(), AnswerSource::Llm)
            }
            Ok(_) => {
                tracing::error!("generative fallback returned empty output");
                AnswerResult::new(APOLOGY_MESSAGE, AnswerSource::Error)
            }
            Err(err) => {
                tracing::error!("generative fallback failed: {}", err);
                AnswerResult::new(APOLOGY_MESSAGE, AnswerSource::Error)
            }
        }
    }
}
