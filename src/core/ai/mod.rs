pub mod ai_service;
pub mod intent;
pub mod models;

pub use ai_service::{AiProvider, AiService};
pub use intent::infer_agent_type;
pub use models::{AiConfig, AiMessage};
