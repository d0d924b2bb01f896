pub mod conversation_feed;

pub use conversation_feed::{Channel, Conversation, ConversationFeed};
