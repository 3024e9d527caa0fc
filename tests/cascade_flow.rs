//! End-to-end cascade behavior with deterministic stub backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use campusqa_backend::answer::AnswerSource;
use campusqa_backend::cascade::{AnswerCascade, APOLOGY_MESSAGE};
use campusqa_backend::core::errors::ApiError;
use campusqa_backend::faq::{FaqIndex, FaqResolver, IndexEntry, QaRecord};
use campusqa_backend::llm::provider::{ChatModel, Embedder};
use campusqa_backend::llm::ChatRequest;
use campusqa_backend::search::client::{SearchClient, SearchSnippet, WebSearchResponse};
use campusqa_backend::search::WebSearchFallback;

/// Embedder with a fixed vector per known text and a call counter.
struct StubEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl StubEmbedder {
    fn new(vectors: Vec<(&str, Vec<f32>)>) -> Arc<Self> {
        Arc::new(Self {
            vectors: vectors
                .into_iter()
                .map(|(text, vector)| (text.to_string(), vector))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        inputs
            .iter()
            .map(|text| {
                self.vectors
                    .get(text)
                    .cloned()
                    .ok_or_else(|| ApiError::Internal(format!("no vector for '{text}'")))
            })
            .collect()
    }
}

/// Chat model returning a canned reply (or a canned failure).
struct StubChat {
    reply: Result<String, ()>,
    calls: AtomicUsize,
}

impl StubChat {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ChatModel for StubChat {
    fn name(&self) -> &str {
        "stub"
    }

    async fn chat(&self, _request: ChatRequest) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .map_err(|_| ApiError::Internal("model timed out".to_string()))
    }
}

/// Search client with a fixed response and a call counter.
struct StubSearch {
    response: WebSearchResponse,
    calls: AtomicUsize,
}

impl StubSearch {
    fn with_response(response: WebSearchResponse) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SearchClient for StubSearch {
    async fn search(&self, _query: &str, _limit: usize) -> Result<WebSearchResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

fn admissions_index() -> Arc<FaqIndex> {
    Arc::new(FaqIndex::from_entries(vec![IndexEntry {
        embedding: vec![1.0, 0.0],
        record: QaRecord {
            question: "What are the admission requirements?".to_string(),
            answer: "High school diploma and entrance exam.".to_string(),
        },
    }]))
}

fn web_stage(search: Arc<StubSearch>, summarizer: Arc<StubChat>) -> WebSearchFallback {
    WebSearchFallback::new(
        search,
        summarizer,
        "Sham University".to_string(),
        vec!["shamuniversity.com".to_string(), "SHAM.UNIV".to_string()],
        3,
    )
}

#[tokio::test]
async fn scenario_close_faq_match_answers_from_faq() {
    // distance ~0.05, well inside the 0.2 threshold
    let embedder = StubEmbedder::new(vec![(
        "What do I need to get admitted?",
        vec![0.95, 0.312_249_9],
    )]);
    let resolver = FaqResolver::new(embedder.clone(), admissions_index(), 0.2);
    let generator = StubChat::replying("unused");
    let cascade = AnswerCascade::new(resolver, None, generator.clone());

    let result = cascade.answer("What do I need to get admitted?").await;
    assert_eq!(result.content, "High school diploma and entrance exam.");
    assert_eq!(result.source, AnswerSource::Faq);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scenario_faq_miss_uses_answer_box() {
    // distance 0.45, past the threshold
    let embedder = StubEmbedder::new(vec![(
        "When is the library open?",
        vec![0.55, 0.835_164_65],
    )]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);

    let search = StubSearch::with_response(WebSearchResponse {
        direct_answer: Some("Open 9am-5pm".to_string()),
        snippets: Vec::new(),
    });
    let summarizer = StubChat::replying("unused summary");
    let generator = StubChat::replying("unused");
    let cascade = AnswerCascade::new(
        resolver,
        Some(web_stage(search.clone(), summarizer.clone())),
        generator.clone(),
    );

    let result = cascade.answer("When is the library open?").await;
    assert_eq!(result.content, "Open 9am-5pm");
    assert_eq!(result.source, AnswerSource::WebSearchAnswerBox);
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    // the answer box short-circuits both the summarizer and the last resort
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scenario_untrusted_snippets_fall_through_to_llm() {
    let embedder = StubEmbedder::new(vec![("Who won the league?", vec![0.0, 1.0])]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);

    let search = StubSearch::with_response(WebSearchResponse {
        direct_answer: None,
        snippets: vec![SearchSnippet {
            text: "unrelated sports news".to_string(),
            link: "https://sports.example/league".to_string(),
        }],
    });
    let summarizer = StubChat::replying("unused summary");
    let generator = StubChat::replying("I'm not certain, but generally...");
    let cascade = AnswerCascade::new(
        resolver,
        Some(web_stage(search.clone(), summarizer.clone())),
        generator.clone(),
    );

    let result = cascade.answer("Who won the league?").await;
    assert_eq!(result.source, AnswerSource::Llm);
    assert_eq!(result.content, "I'm not certain, but generally...");
    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn scenario_total_failure_yields_apology() {
    let embedder = StubEmbedder::new(vec![("Anything at all?", vec![0.0, 1.0])]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);
    let generator = StubChat::failing();
    let cascade = AnswerCascade::new(resolver, None, generator.clone());

    let result = cascade.answer("Anything at all?").await;
    assert_eq!(result.content, APOLOGY_MESSAGE);
    assert_eq!(result.source, AnswerSource::Error);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unconfigured_search_stage_makes_zero_search_calls() {
    let embedder = StubEmbedder::new(vec![("query", vec![0.0, 1.0])]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);

    // a search client exists but is deliberately not wired into the cascade
    let search = StubSearch::with_response(WebSearchResponse::default());
    let generator = StubChat::replying("fallback answer");
    let cascade = AnswerCascade::new(resolver, None, generator);

    let result = cascade.answer("query").await;
    assert_eq!(result.source, AnswerSource::Llm);
    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn summarized_trusted_snippets_carry_summary_source() {
    let embedder = StubEmbedder::new(vec![("Which colleges exist?", vec![0.0, 1.0])]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);

    let search = StubSearch::with_response(WebSearchResponse {
        direct_answer: None,
        snippets: vec![
            SearchSnippet {
                text: "untrusted".to_string(),
                link: "https://elsewhere.example".to_string(),
            },
            SearchSnippet {
                text: "Colleges: engineering, medicine, business.".to_string(),
                link: "https://shamuniversity.com/colleges".to_string(),
            },
        ],
    });
    let summarizer = StubChat::replying("The university has three colleges.");
    let generator = StubChat::replying("unused");
    let cascade = AnswerCascade::new(
        resolver,
        Some(web_stage(search, summarizer.clone())),
        generator.clone(),
    );

    let result = cascade.answer("Which colleges exist?").await;
    assert_eq!(result.source, AnswerSource::WebSearchSummary);
    assert_eq!(result.content, "The university has three colleges.");
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_answer_within_threshold_cascades_onward() {
    let index = Arc::new(FaqIndex::from_entries(vec![IndexEntry {
        embedding: vec![1.0, 0.0],
        record: QaRecord {
            question: "ghost question".to_string(),
            answer: String::new(),
        },
    }]));
    let embedder = StubEmbedder::new(vec![("ghost question", vec![1.0, 0.0])]);
    let resolver = FaqResolver::new(embedder, index, 0.2);
    let generator = StubChat::replying("answered by the model instead");
    let cascade = AnswerCascade::new(resolver, None, generator);

    let result = cascade.answer("ghost question").await;
    assert_eq!(result.source, AnswerSource::Llm);
}

#[tokio::test]
async fn threshold_boundary_is_closed() {
    // orthogonal unit vectors: distance is exactly 1.0
    let embedder = StubEmbedder::new(vec![("boundary query", vec![0.0, 1.0])]);
    let resolver = FaqResolver::new(embedder.clone(), admissions_index(), 1.0);
    let cascade = AnswerCascade::new(resolver, None, StubChat::replying("unused"));
    assert_eq!(
        cascade.answer("boundary query").await.source,
        AnswerSource::Faq
    );

    // any threshold strictly below 1.0 rejects the same match
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.999_999);
    let cascade = AnswerCascade::new(resolver, None, StubChat::replying("past the cutoff"));
    assert_eq!(
        cascade.answer("boundary query").await.source,
        AnswerSource::Llm
    );
}

#[tokio::test]
async fn identical_queries_get_identical_answers() {
    let embedder = StubEmbedder::new(vec![(
        "What are the admission requirements?",
        vec![1.0, 0.0],
    )]);
    let resolver = FaqResolver::new(embedder, admissions_index(), 0.2);
    let cascade = AnswerCascade::new(resolver, None, StubChat::replying("unused"));

    let first = cascade.answer("What are the admission requirements?").await;
    let second = cascade.answer("What are the admission requirements?").await;
    assert_eq!(first, second);
}
