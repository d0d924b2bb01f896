// The knowledge base owns the authoritative list of knowledge items.
// It holds the list in memory and writes the whole list through a
// SnapshotStore after every mutation. It has no idea whether that store is a
// JSON file, a SQLite table or a map in memory.

use super::knowledge_models::{KnowledgeItem, KnowledgeItemPatch, NewKnowledgeItem, SearchResult};
use super::scoring::{category_matches, search_knowledge, ScoringWeights, DEFAULT_SEARCH_LIMIT};
use super::seed::default_items;
use super::smart_search::{smart_search, AgentType};
use super::snapshot_store::{SnapshotStore, StoreError};
use tokio::sync::RwLock;

/// Storage key used when the caller does not pick one.
pub const DEFAULT_KNOWLEDGE_KEY: &str = "educhat_knowledge_base";

/// The knowledge base service.
///
/// Constructed once at startup and shared (usually behind an `Arc`) with
/// everything that needs knowledge. Generic over the snapshot backend.
pub struct KnowledgeBase<S: SnapshotStore> {
    store: S,
    key: String,
    weights: ScoringWeights,
    items: RwLock<Vec<KnowledgeItem>>,
}

impl<S: SnapshotStore> KnowledgeBase<S> {
    /// Loads the snapshot stored under `key`, or installs and persists the
    /// default items when there is none.
    pub async fn load(
        store: S,
        key: impl Into<String>,
        weights: ScoringWeights,
    ) -> Result<Self, StoreError> {
        let key = key.into();

        let items = match store.read(&key).await? {
            Some(snapshot) => {
                let items: Vec<KnowledgeItem> = serde_json::from_str(&snapshot)?;
                tracing::info!(
                    backend = store.backend_name(),
                    key = %key,
                    items = items.len(),
                    "Loaded knowledge base snapshot"
                );
                items
            }
            None => {
                let items = default_items();
                store.write(&key, &serde_json::to_string(&items)?).await?;
                tracing::info!(
                    backend = store.backend_name(),
                    key = %key,
                    items = items.len(),
                    "Seeded default knowledge base"
                );
                items
            }
        };

        Ok(Self {
            store,
            key,
            weights,
            items: RwLock::new(items),
        })
    }

    async fn persist(&self) -> Result<(), StoreError> {
        // The read guard stays alive through the write so no mutation can land
        // between taking the snapshot and storing it.
        let items = self.items.read().await;
        let snapshot = serde_json::to_string(&*items)?;

        if let Err(err) = self.store.write(&self.key, &snapshot).await {
            // The in-memory list keeps the change; only the snapshot is stale.
            tracing::warn!(
                backend = self.store.backend_name(),
                "Failed to persist knowledge base: {err}"
            );
            return Err(err);
        }
        Ok(())
    }

    /// Next time-based id, bumped past the current maximum when the clock
    /// would repeat or go backwards.
    fn next_id(items: &[KnowledgeItem]) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let max_id = items.iter().map(|i| i.id).max().unwrap_or(0);
        now.max(max_id.saturating_add(1))
    }

    /// Adds an item and returns it with its new id.
    pub async fn add(&self, new_item: NewKnowledgeItem) -> Result<KnowledgeItem, StoreError> {
        let mut items = self.items.write().await;
        let item = new_item.with_id(Self::next_id(&items));
        items.push(item.clone());
        drop(items); // Release lock before persisting

        tracing::info!(id = item.id, category = %item.category, "Knowledge item added");
        self.persist().await?;
        Ok(item)
    }

    /// Applies `patch` to the item with `id`. Returns `false` when no item
    /// has that id; the collection is persisted either way.
    pub async fn update(&self, id: i64, patch: KnowledgeItemPatch) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        let found = match items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                patch.apply_to(item);
                true
            }
            None => false,
        };
        drop(items);

        tracing::debug!(id, found, "Knowledge item update");
        self.persist().await?;
        Ok(found)
    }

    /// Removes the item with `id`. Returns `false` when no item has that id;
    /// the collection is persisted either way.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        let found = items.len() != before;
        drop(items);

        tracing::debug!(id, found, "Knowledge item delete");
        self.persist().await?;
        Ok(found)
    }

    /// Every item, in insertion order.
    pub async fn get_all(&self) -> Vec<KnowledgeItem> {
        self.items.read().await.clone()
    }

    /// Items whose category equals `category`, ignoring case.
    pub async fn get_by_category(&self, category: &str) -> Vec<KnowledgeItem> {
        self.items
            .read()
            .await
            .iter()
            .filter(|item| category_matches(&item.category, category))
            .cloned()
            .collect()
    }

    /// Ranked keyword search. `limit` defaults to 5.
    pub async fn search_knowledge(
        &self,
        query: &str,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> SearchResult {
        let items = self.items.read().await;
        search_knowledge(
            &items,
            query,
            category,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            &self.weights,
        )
    }

    /// Search biased towards the categories `agent` cares about.
    pub async fn smart_search(&self, message: &str, agent: AgentType) -> SearchResult {
        let items = self.items.read().await;
        smart_search(&items, message, agent, &self.weights)
    }
}

// ============================================================================
// TESTS
// ============================================================================
