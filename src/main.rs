// This is the entry point of the EduChat knowledge console.
//
// **Architecture Overview:**
// - `core/` = Business logic (knowledge search, AI replies, chat and inbox helpers)
// - `infra/` = Implementations of core traits (snapshot stores, completion API)
// - `console/` = Interactive adapter standing in for the inbox UI
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Hand stdin to the console session

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "console/console_layer.rs"]
mod console;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

mod app_config;

use crate::app_config::{AppConfig, StorageBackend};
use crate::console::ConsoleSession;
use crate::core::ai::{AiProvider, AiService};
use crate::core::inbox::{Conversation, ConversationFeed};
use crate::core::knowledge::{KnowledgeBase, SnapshotStore};
use crate::infra::ai::OpenAiClient;
use crate::infra::knowledge::{InMemorySnapshotStore, JsonFileSnapshotStore, SqliteSnapshotStore};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Picks the snapshot backend named in the config.
async fn build_snapshot_store(config: &AppConfig) -> anyhow::Result<Box<dyn SnapshotStore>> {
    let store: Box<dyn SnapshotStore> = match config.storage {
        StorageBackend::Json => Box::new(JsonFileSnapshotStore::new(config.data_dir.clone())),
        StorageBackend::Sqlite => {
            let path = config.sqlite_path();
            let store = SqliteSnapshotStore::new(&path.to_string_lossy())
                .await
                .with_context(|| format!("Failed to open knowledge database {}", path.display()))?;
            Box::new(store)
        }
        StorageBackend::Memory => Box::new(InMemorySnapshotStore::new()),
    };
    Ok(store)
}

/// Loads the inbox conversations file if one exists.
fn load_conversations(path: &Path) -> anyhow::Result<ConversationFeed> {
    if !path.exists() {
        tracing::info!("No conversations file at {}, inbox is empty", path.display());
        return Ok(ConversationFeed::new(Vec::new()));
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let conversations: Vec<Conversation> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!(count = conversations.len(), "Loaded inbox conversations");
    Ok(ConversationFeed::new(conversations))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let store = build_snapshot_store(&config).await?;
    let knowledge = Arc::new(
        KnowledgeBase::load(store, config.knowledge_key.clone(), config.weights)
            .await
            .context("Failed to load knowledge base")?,
    );

    let ai = match &config.openai_api_key {
        Some(api_key) => {
            let client = OpenAiClient::new(api_key.clone(), config.openai_base_url.clone());
            let provider: Box<dyn AiProvider> = Box::new(client);
            tracing::info!(model = %config.ai.model, "AI replies enabled");
            Some(AiService::new(provider, Arc::clone(&knowledge), config.ai.clone()))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set, showing knowledge context only");
            None
        }
    };

    let feed = load_conversations(&config.conversations_path())?;

    let mut session = ConsoleSession::new(knowledge, ai, feed, config.timezone, config.locale);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(stdin).await?;

    Ok(())
}
