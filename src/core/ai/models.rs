use crate::core::knowledge::AgentType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: String,
}

impl AiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: Some(500),
        }
    }
}

/// Reply produced for one customer message.
#[derive(Debug, Clone, PartialEq)]
pub struct AiReply {
    pub text: String,
    /// The persona that answered.
    pub agent: AgentType,
    /// Hand the conversation to a human operator.
    pub transfer_to_human: bool,
    /// How many knowledge items grounded the reply.
    pub context_items: usize,
}
