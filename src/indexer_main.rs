//! Offline tooling: `faq-indexer generate <corpus files...>` synthesizes
//! QA records from corpus paragraphs; `faq-indexer build [qa_file]`
//! embeds the QA file and persists the vector index the server loads.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};

use campusqa_backend::core::config::{AppPaths, ConfigService};
use campusqa_backend::faq::builder::IndexBuilder;
use campusqa_backend::faq::generator::FaqGenerator;
use campusqa_backend::faq::FaqIndexStore;
use campusqa_backend::llm::GeminiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let paths = Arc::new(AppPaths::new());
    let config = ConfigService::new(paths.clone());

    let models = config.model_settings();
    let Some(api_key) = models.gemini_api_key else {
        bail!("a Gemini API key is required for embedding and generation (GOOGLE_API_KEY or secrets file)");
    };
    let provider = Arc::new(GeminiProvider::new(
        models.api_base,
        api_key,
        models.chat_model,
        models.embedding_model,
    ));

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("build");

    match command {
        "build" => {
            let qa_path = args
                .get(1)
                .map(PathBuf::from)
                .unwrap_or_else(|| paths.qa_file_path.clone());

            let store = FaqIndexStore::with_path(&paths.index_path).await?;
            let builder = IndexBuilder::new(provider, store);
            let report = builder
                .build_from_file(&qa_path)
                .await
                .with_context(|| format!("building index from {}", qa_path.display()))?;

            tracing::info!(
                parsed = report.parsed,
                unique = report.deduplicated,
                inserted = report.inserted,
                "index build finished: {}",
                paths.index_path.display()
            );
        }
        "generate" => {
            let corpus_files: Vec<PathBuf> = args[1..].iter().map(PathBuf::from).collect();
            if corpus_files.is_empty() {
                bail!("usage: faq-indexer generate <corpus file>...");
            }

            let paragraphs = FaqGenerator::load_paragraphs(&corpus_files);
            let generator = FaqGenerator::new(provider);
            let records = generator.generate(&paragraphs).await;

            FaqGenerator::append_to_file(&paths.qa_file_path, &records)?;
            tracing::info!(
                records = records.len(),
                "appended generated QA records to {}",
                paths.qa_file_path.display()
            );
        }
        other => bail!("unknown command '{}': expected 'build' or 'generate'", other),
    }

    Ok(())
}
