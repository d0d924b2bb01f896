pub mod context_builder;
pub mod knowledge_models;
pub mod knowledge_service;
pub mod scoring;
pub mod seed;
pub mod smart_search;
pub mod snapshot_store;

pub use context_builder::build_ai_context;
pub use knowledge_models::{
    KnowledgeItem, KnowledgeItemPatch, KnowledgeItemType, NewKnowledgeItem, SearchResult,
};
pub use knowledge_service::{KnowledgeBase, DEFAULT_KNOWLEDGE_KEY};
pub use scoring::ScoringWeights;
pub use smart_search::AgentType;
pub use snapshot_store::{SnapshotStore, StoreError};
