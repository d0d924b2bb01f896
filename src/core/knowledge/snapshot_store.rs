use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Port for persisting one named text blob (the serialized knowledge base).
///
/// The knowledge service only ever reads the whole snapshot on startup and
/// rewrites the whole snapshot after a mutation, so this is all it needs.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns `None` when nothing was ever written under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces whatever was stored under `key`.
    async fn write(&self, key: &str, snapshot: &str) -> Result<(), StoreError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

// Lets main pick a backend at runtime and still hand a concrete type to the
// generic knowledge service.
#[async_trait]
impl SnapshotStore for Box<dyn SnapshotStore> {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        (**self).write(key, snapshot).await
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
