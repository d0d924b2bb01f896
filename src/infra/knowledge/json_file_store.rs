use crate::core::knowledge::{SnapshotStore, StoreError};
use async_trait::async_trait;
use std::path::PathBuf;

/// File-backed snapshot store. Each key is written as `<dir>/<key>.json`,
/// pretty-printed so the knowledge base can be edited by hand.
pub struct JsonFileSnapshotStore {
    dir: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        Ok(Some(tokio::fs::read_to_string(&path).await?))
    }

    async fn write(&self, key: &str, snapshot: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Re-indent so the file on disk stays readable.
        let value: serde_json::Value = serde_json::from_str(snapshot)?;
        let pretty = serde_json::to_string_pretty(&value)?;

        tokio::fs::write(self.path_for(key), pretty).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge::{
        KnowledgeBase, KnowledgeItemType, NewKnowledgeItem, ScoringWeights,
    };
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let store = JsonFileSnapshotStore::new(tmp.path());
        assert_eq!(store.read("kb").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_creates_directory_and_pretty_prints() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let store = JsonFileSnapshotStore::new(&dir);

        store.write("kb", r#"[{"a":1}]"#).await.unwrap();

        let on_disk = std::fs::read_to_string(dir.join("kb.json")).unwrap();
        assert!(on_disk.contains('\n'));
        let snapshot = store.read("kb").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value[0]["a"], 1);
    }

    #[tokio::test]
    async fn test_json_persistence_roundtrip() {
        let tmp = TempDir::new().unwrap();

        let store = JsonFileSnapshotStore::new(tmp.path());
        let kb = KnowledgeBase::load(store, "kb", ScoringWeights::default())
            .await
            .unwrap();
        kb.add(NewKnowledgeItem {
            item_type: KnowledgeItemType::Website,
            title: "Blog EduChat".to_string(),
            content: "Artigos sobre atendimento".to_string(),
            category: "Produto".to_string(),
            keywords: Vec::new(),
        })
        .await
        .unwrap();

        // Reload from file
        let store = JsonFileSnapshotStore::new(tmp.path());
        let kb2 = KnowledgeBase::load(store, "kb", ScoringWeights::default())
            .await
            .unwrap();
        assert_eq!(kb2.get_all().await, kb.get_all().await);
        assert_eq!(kb2.get_all().await.len(), 6);
    }
}
