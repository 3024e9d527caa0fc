use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::AppPaths;

/// Default acceptance cutoff for the FAQ distance policy.
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.2;
/// Default number of web snippets fed to the summarizer.
pub const DEFAULT_SEARCH_RESULT_LIMIT: usize = 3;

/// Distance-threshold policy for the FAQ resolver.
#[derive(Debug, Clone)]
pub struct FaqSettings {
    pub distance_threshold: f32,
}

/// Web-search fallback settings. `serper_api_key` comes from the secrets
/// file; the fallback is disabled entirely when it is absent.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub context_phrase: String,
    pub trusted_domains: Vec<String>,
    pub result_limit: usize,
    pub country: String,
    pub language: String,
    pub serper_api_key: Option<String>,
}

/// Generative-model settings (chat completion + question embeddings).
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub chat_model: String,
    pub embedding_model: String,
    pub api_base: String,
    pub gemini_api_key: Option<String>,
}

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("CAMPUSQA_CONFIG_PATH") {
            return PathBuf::from(path);
        }

        let user_config = self.paths.user_data_dir.join("config.yml");
        if user_config.exists() {
            return user_config;
        }

        self.paths.project_root.join("config.yml")
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.paths.secrets_path.clone()
    }

    /// Load the public config merged with the secrets file (secrets win).
    pub fn load_config(&self) -> Value {
        let public_config = load_yaml_file(&self.config_path());
        let secrets_config = load_yaml_file(&self.secrets_path());
        deep_merge(&public_config, &secrets_config)
    }

    pub fn faq_settings(&self) -> FaqSettings {
        let config = self.load_config();
        let threshold = config
            .get("faq")
            .and_then(|v| v.get("distance_threshold"))
            .and_then(|v| v.as_f64())
            .map(|v| v as f32)
            .unwrap_or(DEFAULT_DISTANCE_THRESHOLD);

        FaqSettings {
            distance_threshold: threshold,
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        let config = self.load_config();
        let search = config.get("search").cloned().unwrap_or(Value::Null);

        let context_phrase = search
            .get("context_phrase")
            .and_then(|v| v.as_str())
            .unwrap_or("Sham University")
            .to_string();

        let trusted_domains = search
            .get("trusted_domains")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|domains| !domains.is_empty())
            .unwrap_or_else(|| {
                vec!["shamuniversity.com".to_string(), "SHAM.UNIV".to_string()]
            });

        let result_limit = search
            .get("result_limit")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SEARCH_RESULT_LIMIT);

        let country = search
            .get("country")
            .and_then(|v| v.as_str())
            .unwrap_or("sa")
            .to_string();
        let language = search
            .get("language")
            .and_then(|v| v.as_str())
            .unwrap_or("ar")
            .to_string();

        let serper_api_key = search
            .get("serper_api_key")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .or_else(|| env::var("SERPER_API_KEY").ok().filter(|s| !s.is_empty()));

        SearchSettings {
            context_phrase,
            trusted_domains,
            result_limit,
            country,
            language,
            serper_api_key,
        }
    }

    pub fn model_settings(&self) -> ModelSettings {
        let config = self.load_config();
        let models = config.get("models").cloned().unwrap_or(Value::Null);

        let chat_model = models
            .get("chat_model")
            .and_then(|v| v.as_str())
            .unwrap_or("gemini-1.5-flash")
            .to_string();
        let embedding_model = models
            .get("embedding_model")
            .and_then(|v| v.as_str())
            .unwrap_or("text-embedding-004")
            .to_string();
        let api_base = models
            .get("api_base")
            .and_then(|v| v.as_str())
            .unwrap_or("https://generativelanguage.googleapis.com/v1beta")
            .to_string();

        let gemini_api_key = models
            .get("gemini_api_key")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .or_else(|| env::var("GOOGLE_API_KEY").ok().filter(|s| !s.is_empty()));

        ModelSettings {
            chat_model,
            embedding_model,
            api_base,
            gemini_api_key,
        }
    }
}

fn load_yaml_file(path: &Path) -> Value {
    if !path.exists() {
        return Value::Object(Map::new());
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<Value>(&contents) {
            Ok(value) => match value {
                Value::Object(_) => value,
                _ => Value::Object(Map::new()),
            },
            Err(_) => Value::Object(Map::new()),
        },
        Err(_) => Value::Object(Map::new()),
    }
}

fn deep_merge(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in override_map {
                let merged_value = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), merged_value);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}
