pub mod message_groups;

pub use message_groups::{group_messages_by_day, ChatMessage, Locale};
