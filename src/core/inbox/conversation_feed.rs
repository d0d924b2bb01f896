// Conversation list paging.
//
// The inbox shows conversations most recent first and loads more as the user
// scrolls. This module is the data side of that: an ordered feed and
// offset-cursor pages over it, optionally narrowed to one channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Messaging channel a conversation arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    WhatsApp,
    Instagram,
    Facebook,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::WhatsApp => "whatsapp",
            Channel::Instagram => "instagram",
            Channel::Facebook => "facebook",
            Channel::Email => "email",
        };
        f.write_str(name)
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(Channel::WhatsApp),
            "instagram" => Ok(Channel::Instagram),
            "facebook" => Ok(Channel::Facebook),
            "email" | "e-mail" => Ok(Channel::Email),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: u64,
    pub contact_name: String,
    pub channel: Channel,
    pub last_message_at: DateTime<Utc>,
    #[serde(default)]
    pub last_message_preview: String,
    #[serde(default)]
    pub unread_count: u32,
}

/// One page of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<Conversation>,
    /// Cursor for the next page, `None` once the feed is exhausted.
    pub next_cursor: Option<usize>,
    pub has_more: bool,
}

/// Conversations ordered most recent first (ties by ascending id).
pub struct ConversationFeed {
    conversations: Vec<Conversation>,
}

impl ConversationFeed {
    pub fn new(mut conversations: Vec<Conversation>) -> Self {
        conversations.sort_by(|a, b| {
            b.last_message_at
                .cmp(&a.last_message_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self { conversations }
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Total unread messages, optionally for one channel.
    pub fn unread_total(&self, channel: Option<Channel>) -> u32 {
        self.conversations
            .iter()
            .filter(|c| channel.map_or(true, |ch| c.channel == ch))
            .map(|c| c.unread_count)
            .sum()
    }

    /// Returns up to `page_size` conversations starting at `cursor` (an offset
    /// into the filtered order; `None` starts from the top).
    pub fn page(
        &self,
        cursor: Option<usize>,
        page_size: usize,
        channel: Option<Channel>,
    ) -> FeedPage {
        let start = cursor.unwrap_or(0);
        let filtered: Vec<&Conversation> = self
            .conversations
            .iter()
            .filter(|c| channel.map_or(true, |ch| c.channel == ch))
            .collect();

        let items: Vec<Conversation> = filtered
            .iter()
            .skip(start)
            .take(page_size)
            .map(|c| (*c).clone())
            .collect();

        let end = start.saturating_add(items.len());
        let has_more = end < filtered.len();

        FeedPage {
            items,
            next_cursor: has_more.then_some(end),
            has_more,
        }
    }
}
