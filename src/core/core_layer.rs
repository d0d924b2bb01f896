// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "knowledge/mod.rs"]
pub mod knowledge;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "chat/mod.rs"]
pub mod chat;

#[path = "inbox/mod.rs"]
pub mod inbox;
