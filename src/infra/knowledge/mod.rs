// Snapshot backends for the knowledge base.

mod in_memory;
mod json_file_store;
mod sqlite_store;

pub use in_memory::InMemorySnapshotStore;
pub use json_file_store::JsonFileSnapshotStore;
pub use sqlite_store::SqliteSnapshotStore;
