use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::cascade::AnswerCascade;
use crate::core::config::{AppPaths, ConfigService};
use crate::faq::{FaqIndex, FaqResolver};
use crate::history::HistoryStore;
use crate::llm::provider::{ChatModel, Embedder};
use crate::llm::GeminiProvider;
use crate::search::{SerperClient, WebSearchFallback};

#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: ConfigService,
    pub history: HistoryStore,
    pub cascade: Arc<AnswerCascade>,
    pub index_size: usize,
    pub search_enabled: bool,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let paths = Arc::new(AppPaths::new());
        let config = ConfigService::new(paths.clone());
        let history = HistoryStore::new(paths.history_db_path.clone()).await?;

        let models = config.model_settings();
        if models.gemini_api_key.is_none() {
            tracing::warn!(
                "no Gemini API key configured; generative calls will fail into the apology path"
            );
        }
        let provider = Arc::new(GeminiProvider::new(
            models.api_base,
            models.gemini_api_key.unwrap_or_default(),
            models.chat_model,
            models.embedding_model,
        ));

        let index = Arc::new(FaqIndex::open(&paths.index_path).await?);
        let index_size = index.len();
        if index.is_empty() {
            tracing::warn!(
                "FAQ index at {} is empty; run faq-indexer to build it",
                paths.index_path.display()
            );
        }

        let faq = config.faq_settings();
        let resolver = FaqResolver::new(
            provider.clone() as Arc<dyn Embedder>,
            index,
            faq.distance_threshold,
        );

        let search = config.search_settings();
        let search_enabled = search.serper_api_key.is_some();
        let web = search.serper_api_key.map(|api_key| {
            WebSearchFallback::new(
                Arc::new(SerperClient::new(api_key, search.country, search.language)),
                provider.clone() as Arc<dyn ChatModel>,
                search.context_phrase,
                search.trusted_domains,
                search.result_limit,
            )
        });
        if !search_enabled {
            tracing::info!("no search credentials configured; web fallback disabled");
        }

        let cascade = Arc::new(AnswerCascade::new(
            resolver,
            web,
            provider as Arc<dyn ChatModel>,
        ));

        Ok(Arc::new(AppState {
            paths,
            config,
            history,
            cascade,
            index_size,
            search_enabled,
            started_at: Utc::now(),
        }))
    }
}
