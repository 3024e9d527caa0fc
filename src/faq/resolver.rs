use std::sync::Arc;

use crate::answer::{AnswerResult, AnswerSource};
use crate::llm::Embedder;

use super::store::FaqIndex;

/// Stage 1 of the cascade: top-1 similarity search over the FAQ index
/// with a distance-threshold acceptance policy.
///
/// `None` always means "try the next stage", never an error: an empty
/// index, a match beyond the threshold, a matched entry with an empty
/// answer, and an embedding-service failure all fall through identically.
pub struct FaqResolver {
    embedder: Arc<dyn Embedder>,
    index: Arc<FaqIndex>,
    distance_threshold: f32,
}

impl FaqResolver {
    /// The threshold is a tunable policy value and is always injected,
    /// never hard-coded here.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<FaqIndex>, distance_threshold: f32) -> Self {
        Self {
            embedder,
            index,
            distance_threshold,
        }
    }

    pub async fn resolve(&self, query: &str) -> Option<AnswerResult> {
        if self.index.is_empty() {
            return None;
        }

        let embeddings = match self.embedder.embed(&[query.to_string()]).await {
            Ok(embeddings) => embeddings,
            Err(err) => {
                tracing::warn!("FAQ embedding failed, falling through: {}", err);
                return None;
            }
        };
        let query_embedding = embeddings.into_iter().next()?;

        let matched = self.index.nearest(&query_embedding)?;
        tracing::debug!(
            distance = matched.distance,
            question = %matched.entry.record.question,
            "best FAQ match"
        );

        // Closed bound: a distance exactly at the threshold is an accept.
        if matched.distance > self.distance_threshold {
            return None;
        }

        let answer = matched.entry.record.answer.trim();
        if answer.is_empty() {
            tracing::warn!(
                question = %matched.entry.record.question,
                "FAQ match within threshold has no answer, falling through"
            );
            return None;
        }

        Some(AnswerResult::new(answer, AnswerSource::Faq))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::core::errors::ApiError;
    use crate::faq::records::QaRecord;
    use crate::faq::store::IndexEntry;

    use super::*;

    /// Deterministic embedder: fixed vector per known input text.
    struct StaticEmbedder {
        vectors: HashMap<String, Vec<f32>>,
    }

    #[async_trait]
    impl Embedder for StaticEmbedder {
        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
            inputs
                .iter()
                .map(|text| {
                    self.vectors
                        .get(text)
                        .cloned()
                        .ok_or_else(|| ApiError::Internal(format!("no vector for {text}")))
                })
                .collect()
        }
    }

    fn index_with(question: &str, answer: &str, embedding: Vec<f32>) -> Arc<FaqIndex> {
        Arc::new(FaqIndex::from_entries(vec![IndexEntry {
            embedding,
            record: QaRecord {
                question: question.to_string(),
                answer: answer.to_string(),
            },
        }]))
    }

    fn embedder_for(query: &str, vector: Vec<f32>) -> Arc<dyn Embedder> {
        let mut vectors = HashMap::new();
        vectors.insert(query.to_string(), vector);
        Arc::new(StaticEmbedder { vectors })
    }

    #[tokio::test]
    async fn accepts_close_match() {
        let index = index_with(
            "What are the admission requirements?",
            "High school diploma and entrance exam.",
            vec![1.0, 0.0],
        );
        let embedder = embedder_for("admission requirements?", vec![1.0, 0.0]);
        let resolver = FaqResolver::new(embedder, index, 0.2);

        let result = resolver.resolve("admission requirements?").await.unwrap();
        assert_eq!(result.content, "High school diploma and entrance exam.");
        assert_eq!(result.source, AnswerSource::Faq);
    }

    #[tokio::test]
    async fn distance_exactly_at_threshold_is_accepted() {
        // orthogonal unit vectors give an exactly representable distance of 1.0
        let index = index_with("q", "a", vec![1.0, 0.0]);
        let embedder = embedder_for("query", vec![0.0, 1.0]);
        let resolver = FaqResolver::new(embedder, index, 1.0);

        assert!(resolver.resolve("query").await.is_some());
    }

    #[tokio::test]
    async fn distance_just_past_threshold_is_rejected() {
        let index = index_with("q", "a", vec![1.0, 0.0]);
        let embedder = embedder_for("query", vec![0.0, 1.0]);
        let resolver = FaqResolver::new(embedder, index, 0.999);

        assert!(resolver.resolve("query").await.is_none());
    }

    #[tokio::test]
    async fn empty_answer_within_threshold_falls_through() {
        let index = index_with("q", "   ", vec![1.0, 0.0]);
        let embedder = embedder_for("query", vec![1.0, 0.0]);
        let resolver = FaqResolver::new(embedder, index, 0.2);

        assert!(resolver.resolve("query").await.is_none());
    }

    #[tokio::test]
    async fn empty_index_is_a_miss() {
        let index = Arc::new(FaqIndex::from_entries(Vec::new()));
        let embedder = embedder_for("query", vec![1.0, 0.0]);
        let resolver = FaqResolver::new(embedder, index, 0.2);

        assert!(resolver.resolve("query").await.is_none());
    }

    #[tokio::test]
    async fn embedding_failure_is_a_miss_not_an_error() {
        let index = index_with("q", "a", vec![1.0, 0.0]);
        // embedder has no vector for this query and errors out
        let embedder = embedder_for("something else", vec![1.0, 0.0]);
        let resolver = FaqResolver::new(embedder, index, 0.2);

        assert!(resolver.resolve("query").await.is_none());
    }
}
