// In-memory implementation of SnapshotStore.
//
// Nothing survives a restart, which makes it the backend for tests and for
// the `memory` storage mode.

use crate::core::knowledge::{SnapshotStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;

/// Snapshots keyed by name, held in a concurrent map.
pub struct InMemorySnapshotStore {
    snapshots: DashMap<String, String>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
        }
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.snapshots.get(key).map(|entry| entry.value().clone()))
    }

    async fn write(&self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        self.snapshots.insert(key.to_string(), snapshot.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
