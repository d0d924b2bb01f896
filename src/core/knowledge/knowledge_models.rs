use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a knowledge item came from. Purely a provenance tag; scoring treats
/// every type the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeItemType {
    Faq,
    Document,
    Website,
}

impl KnowledgeItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeItemType::Faq => "faq",
            KnowledgeItemType::Document => "document",
            KnowledgeItemType::Website => "website",
        }
    }
}

impl fmt::Display for KnowledgeItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KnowledgeItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "faq" => Ok(KnowledgeItemType::Faq),
            "document" => Ok(KnowledgeItemType::Document),
            "website" => Ok(KnowledgeItemType::Website),
            other => Err(format!("unknown knowledge item type: {other}")),
        }
    }
}

/// One unit of reference content that can ground an AI reply.
///
/// This is exactly the shape written to the persisted snapshot, so field names
/// follow the camelCase layout of the stored JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub item_type: KnowledgeItemType,
    pub title: String,
    pub content: String,
    pub category: String,
    /// May be empty, never missing.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A knowledge item before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKnowledgeItem {
    pub item_type: KnowledgeItemType,
    pub title: String,
    pub content: String,
    pub category: String,
    pub keywords: Vec<String>,
}

impl NewKnowledgeItem {
    pub fn with_id(self, id: i64) -> KnowledgeItem {
        KnowledgeItem {
            id,
            item_type: self.item_type,
            title: self.title,
            content: self.content,
            category: self.category,
            keywords: self.keywords,
        }
    }
}

/// Partial update for an existing item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeItemPatch {
    pub item_type: Option<KnowledgeItemType>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<Vec<String>>,
}

impl KnowledgeItemPatch {
    pub fn apply_to(self, item: &mut KnowledgeItem) {
        if let Some(item_type) = self.item_type {
            item.item_type = item_type;
        }
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(content) = self.content {
            item.content = content;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(keywords) = self.keywords {
            item.keywords = keywords;
        }
    }
}

/// A knowledge item paired with the score it earned in one search call.
///
/// The score only has meaning inside the `SearchResult` that produced it,
/// which is why it lives here and not on `KnowledgeItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub item: KnowledgeItem,
    pub relevance_score: u32,
}

/// Outcome of a knowledge search, highest relevance first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub items: Vec<ScoredItem>,
    /// Number of entries in `items` after filtering and truncation.
    pub total_found: usize,
    /// Tokens actually used for scoring.
    pub search_terms: Vec<String>,
}

impl SearchResult {
    pub fn new(items: Vec<ScoredItem>, search_terms: Vec<String>) -> Self {
        Self {
            total_found: items.len(),
            items,
            search_terms,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
