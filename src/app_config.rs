// Application configuration, read from environment variables.
// `main` loads `.env` first so local setups can keep everything in one file.

use crate::core::ai::AiConfig;
use crate::core::chat::Locale;
use crate::core::knowledge::{ScoringWeights, DEFAULT_KNOWLEDGE_KEY};
use crate::infra::ai::openai_client::DEFAULT_BASE_URL;
use chrono_tz::Tz;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown storage backend '{0}' (expected json, sqlite or memory)")]
    UnknownStorage(String),
}

/// Where the knowledge base snapshot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Json,
    Sqlite,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub knowledge_key: String,
    pub timezone: Tz,
    pub locale: Locale,
    pub weights: ScoringWeights,
    /// `None` runs the console in context-only mode.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment, tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("EDUCHAT_STORAGE") {
            Some(value) => value.parse()?,
            None => StorageBackend::Json,
        };

        let defaults = ScoringWeights::default();
        let weights = ScoringWeights {
            title: parse_or(&lookup, "EDUCHAT_WEIGHT_TITLE", defaults.title),
            keyword: parse_or(&lookup, "EDUCHAT_WEIGHT_KEYWORD", defaults.keyword),
            content: parse_or(&lookup, "EDUCHAT_WEIGHT_CONTENT", defaults.content),
            whole_word: parse_or(&lookup, "EDUCHAT_WEIGHT_WHOLE_WORD", defaults.whole_word),
        };

        let ai_defaults = AiConfig::default();
        let ai = AiConfig {
            model: lookup("OPENAI_MODEL").unwrap_or(ai_defaults.model),
            temperature: parse_or(&lookup, "OPENAI_TEMPERATURE", ai_defaults.temperature),
            max_tokens: ai_defaults.max_tokens,
        };

        Ok(Self {
            data_dir: lookup("EDUCHAT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            storage,
            knowledge_key: lookup("EDUCHAT_KNOWLEDGE_KEY")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_KEY.to_string()),
            timezone: parse_or(&lookup, "EDUCHAT_TIMEZONE", chrono_tz::America::Sao_Paulo),
            locale: parse_or(&lookup, "EDUCHAT_LOCALE", Locale::PtBr),
            weights,
            openai_api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ai,
        })
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("knowledge.db")
    }

    pub fn conversations_path(&self) -> PathBuf {
        self.data_dir.join("conversations.json")
    }
}

/// Parses `name`, falling back to `default` (with a warning) when the value is
/// missing or does not parse.
fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value {:?} for {}", raw, name);
            default
        }),
    }
}
