//! Offline QA-pair synthesis: corpus paragraphs in, `---`-delimited QA
//! records out. The generated file is reviewed out-of-band before the
//! index is built from it; nothing here guarantees answer correctness.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::core::errors::ApiError;
use crate::llm::{prompts, ChatModel, ChatRequest};

use super::records::{format_qa_records, parse_qa_records, QaRecord};

/// Paragraphs shorter than this rarely yield a usable QA pair.
const MIN_PARAGRAPH_CHARS: usize = 30;

pub struct FaqGenerator {
    chat: Arc<dyn ChatModel>,
}

impl FaqGenerator {
    pub fn new(chat: Arc<dyn ChatModel>) -> Self {
        Self { chat }
    }

    /// Read corpus files produced by the crawler/cleaner: one semantic
    /// paragraph per line, exact duplicates dropped across all files.
    pub fn load_paragraphs(paths: &[impl AsRef<Path>]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut paragraphs = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    tracing::warn!("skipping corpus file {}: {}", path.display(), err);
                    continue;
                }
            };

            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if seen.insert(line.to_string()) {
                    paragraphs.push(line.to_string());
                }
            }
        }

        tracing::info!(count = paragraphs.len(), "loaded unique corpus paragraphs");
        paragraphs
    }

    /// Prompt the chat model once per paragraph and parse its output with
    /// the same record parser the index builder uses. A failing or
    /// unparseable chunk is logged and skipped, never fatal.
    pub async fn generate(&self, paragraphs: &[String]) -> Vec<QaRecord> {
        let mut records = Vec::new();

        for (i, paragraph) in paragraphs.iter().enumerate() {
            if paragraph.chars().count() < MIN_PARAGRAPH_CHARS {
                continue;
            }

            let request =
                ChatRequest::prompt(prompts::qa_generation_prompt(paragraph)).with_temperature(0.3);

            match self.chat.chat(request).await {
                Ok(output) => {
                    let parsed = parse_qa_records(&output);
                    if parsed.is_empty() {
                        tracing::warn!(chunk = i, "model output yielded no QA records");
                    }
                    records.extend(parsed);
                }
                Err(err) => {
                    tracing::warn!(chunk = i, "QA generation failed: {}", err);
                }
            }
        }

        records
    }

    /// Append generated records to the QA file consumed by `faq-indexer`.
    pub fn append_to_file(path: &Path, records: &[QaRecord]) -> Result<(), ApiError> {
        use std::io::Write;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(ApiError::internal)?;
        file.write_all(format_qa_records(records).as_bytes())
            .map_err(ApiError::internal)?;
        Ok(())
    }
}
