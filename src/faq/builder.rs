//! Offline index construction: QA record file in, persisted vector
//! index out. Run via the `faq-indexer` binary, never at query time.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::Embedder;

use super::records::{parse_qa_records, QaRecord};
use super::store::FaqIndexStore;

const EMBED_BATCH_SIZE: usize = 16;

#[derive(Debug, Default)]
pub struct BuildReport {
    pub parsed: usize,
    pub deduplicated: usize,
    pub inserted: usize,
}

pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    store: FaqIndexStore,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn Embedder>, store: FaqIndexStore) -> Self {
        Self { embedder, store }
    }

    pub async fn build_from_file(&self, qa_path: &Path) -> Result<BuildReport, ApiError> {
        let content = std::fs::read_to_string(qa_path).map_err(|e| {
            ApiError::NotFound(format!("QA file {}: {}", qa_path.display(), e))
        })?;

        let records = parse_qa_records(&content);
        self.build_from_records(records).await
    }

    /// Embed the question side of each record and persist it. The store's
    /// unique constraint also drops exact duplicates across repeated runs.
    pub async fn build_from_records(
        &self,
        records: Vec<QaRecord>,
    ) -> Result<BuildReport, ApiError> {
        let mut report = BuildReport {
            parsed: records.len(),
            ..Default::default()
        };

        let mut seen = HashSet::new();
        let unique: Vec<QaRecord> = records
            .into_iter()
            .filter(|record| seen.insert((record.question.clone(), record.answer.clone())))
            .collect();
        report.deduplicated = unique.len();

        for batch in unique.chunks(EMBED_BATCH_SIZE) {
            let questions: Vec<String> = batch.iter().map(|r| r.question.clone()).collect();
            let embeddings = self.embedder.embed(&questions).await?;

            if embeddings.len() != batch.len() {
                return Err(ApiError::Internal(format!(
                    "embedding batch size mismatch: {} != {}",
                    embeddings.len(),
                    batch.len()
                )));
            }

            let items = batch.iter().cloned().zip(embeddings).collect();
            report.inserted += self.store.insert_batch(items).await?;
            tracing::info!(
                inserted = report.inserted,
                total = report.deduplicated,
                "index build progress"
            );
        }

        Ok(report)
    }
}
