// =============================================================================
// RELEVANCE SCORING
// =============================================================================
//
// Keyword relevance search over knowledge items. Everything here is pure: the
// functions take a slice of items and return a ranked copy, so the same code
// serves the live knowledge base and in-memory fixtures in tests.
//
// For every query token an item accumulates:
// - `title` points when its title contains the token
// - `keyword` points when any keyword contains the token
// - `content` points when its content contains the token
// - `whole_word` points when the token appears as a whole word anywhere

use super::knowledge_models::{KnowledgeItem, ScoredItem, SearchResult};
use regex::Regex;

/// Default number of results returned by `search_knowledge`.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Tokens with this many characters or fewer are ignored.
const MAX_IGNORED_TOKEN_LEN: usize = 2;

// =============================================================================
// WEIGHTS
// =============================================================================

/// Points awarded per token for each kind of match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub title: u32,
    pub keyword: u32,
    pub content: u32,
    pub whole_word: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 10,
            keyword: 8,
            content: 5,
            whole_word: 3,
        }
    }
}

// =============================================================================
// TOKENIZATION
// =============================================================================

/// Lowercases the query, splits on whitespace and drops tokens of two
/// characters or fewer. Punctuation stays attached to its token.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_IGNORED_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Case-insensitive category equality.
pub fn category_matches(category: &str, wanted: &str) -> bool {
    category.to_lowercase() == wanted.to_lowercase()
}

// =============================================================================
// SCORING
// =============================================================================

/// Pre-lowered text of one item so each token does not re-lowercase it.
struct ItemText {
    title: String,
    content: String,
    keywords: Vec<String>,
    combined: String,
}

impl ItemText {
    fn new(item: &KnowledgeItem) -> Self {
        Self {
            title: item.title.to_lowercase(),
            content: item.content.to_lowercase(),
            keywords: item.keywords.iter().map(|k| k.to_lowercase()).collect(),
            combined: format!(
                "{} {} {}",
                item.title,
                item.content,
                item.keywords.join(" ")
            ),
        }
    }
}

fn whole_word_pattern(token: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(token))).ok()
}

fn score_text(
    text: &ItemText,
    tokens: &[String],
    patterns: &[Option<Regex>],
    weights: &ScoringWeights,
) -> u32 {
    let mut score = 0;

    for (token, pattern) in tokens.iter().zip(patterns) {
        if text.title.contains(token.as_str()) {
            score += weights.title;
        }
        if text.keywords.iter().any(|k| k.contains(token.as_str())) {
            score += weights.keyword;
        }
        if text.content.contains(token.as_str()) {
            score += weights.content;
        }
        if pattern.as_ref().is_some_and(|re| re.is_match(&text.combined)) {
            score += weights.whole_word;
        }
    }

    score
}

/// Scores a single item against already tokenized query terms.
pub fn score_item(item: &KnowledgeItem, tokens: &[String], weights: &ScoringWeights) -> u32 {
    let patterns: Vec<Option<Regex>> = tokens.iter().map(|t| whole_word_pattern(t)).collect();
    score_text(&ItemText::new(item), tokens, &patterns, weights)
}

// =============================================================================
// SEARCH
// =============================================================================

/// Ranks `items` against `query`.
///
/// Algorithm:
/// 1. Tokenize; no usable tokens means an empty result
/// 2. Keep only items in `category` when one is given
/// 3. Score, drop zero scores
/// 4. Sort by score descending, then id ascending
/// 5. Truncate to `limit`
pub fn search_knowledge(
    items: &[KnowledgeItem],
    query: &str,
    category: Option<&str>,
    limit: usize,
    weights: &ScoringWeights,
) -> SearchResult {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return SearchResult::empty();
    }

    // Compile each whole-word pattern once per search, not once per item.
    let patterns: Vec<Option<Regex>> = tokens.iter().map(|t| whole_word_pattern(t)).collect();

    let mut scored: Vec<ScoredItem> = items
        .iter()
        .filter(|item| category.map_or(true, |c| category_matches(&item.category, c)))
        .filter_map(|item| {
            let score = score_text(&ItemText::new(item), &tokens, &patterns, weights);
            (score > 0).then(|| ScoredItem {
                item: item.clone(),
                relevance_score: score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.relevance_score
            .cmp(&a.relevance_score)
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    scored.truncate(limit);

    tracing::debug!(
        terms = tokens.len(),
        hits = scored.len(),
        category = category.unwrap_or("*"),
        "Knowledge search"
    );

    SearchResult::new(scored, tokens)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge::knowledge_models::KnowledgeItemType;
    use crate::core::knowledge::seed::default_items;

    fn item(
        id: i64,
        title: &str,
        content: &str,
        category: &str,
        keywords: &[&str],
    ) -> KnowledgeItem {
        KnowledgeItem {
            id,
            item_type: KnowledgeItemType::Faq,
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_tokenize_drops_short_tokens() {
        assert_eq!(
            tokenize("Qual o PREÇO do plano?"),
            vec!["qual", "preço", "plano?"]
        );
        assert!(tokenize("a ok eu").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_counts_characters_not_bytes() {
        // "é" is two bytes but one character
        assert!(tokenize("é").is_empty());
        assert_eq!(tokenize("céu"), vec!["céu"]);
    }

    #[test]
    fn test_short_token_queries_return_empty_result() {
        let items = default_items();
        for query in ["a", "ok", "eu", "a ok eu", ""] {
            let result = search_knowledge(&items, query, None, 5, &ScoringWeights::default());
            assert_eq!(result, SearchResult::empty(), "query {query:?}");
        }
    }

    #[test]
    fn test_each_field_weight_is_applied() {
        let weights = ScoringWeights::default();
        let tokens = tokenize("boleto");

        let in_title = item(1, "Boleto bancário", "x", "Financeiro", &[]);
        // title substring + whole word
        assert_eq!(score_item(&in_title, &tokens, &weights), 13);

        let in_keywords = item(2, "x", "y", "Financeiro", &["boletos"]);
        // keyword substring, no whole-word match on "boletos"
        assert_eq!(score_item(&in_keywords, &tokens, &weights), 8);

        let in_content = item(3, "x", "pague no boleto", "Financeiro", &[]);
        assert_eq!(score_item(&in_content, &tokens, &weights), 8);

        let nowhere = item(4, "x", "y", "Financeiro", &["pix"]);
        assert_eq!(score_item(&nowhere, &tokens, &weights), 0);
    }

    #[test]
    fn test_scores_accumulate_across_tokens() {
        let weights = ScoringWeights::default();
        let target = item(1, "Cancelar assinatura", "z", "Financeiro", &[]);
        let one = score_item(&target, &tokenize("cancelar"), &weights);
        let two = score_item(&target, &tokenize("cancelar assinatura"), &weights);
        assert_eq!(two, one * 2);
    }

    #[test]
    fn test_exact_title_query_scores_at_least_title_weight() {
        let weights = ScoringWeights::default();
        let items = default_items();
        for target in &items {
            let result = search_knowledge(&items, &target.title, None, 1, &weights);
            let tokens = tokenize(&target.title);
            if tokens.is_empty() {
                continue;
            }
            assert!(score_item(target, &tokens, &weights) >= weights.title);
            assert_eq!(result.items.len(), 1);
            assert_eq!(result.items[0].item.id, target.id, "title {:?}", target.title);
        }
    }

    #[test]
    fn test_cancel_subscription_ranks_first_on_seed_data() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let result = search_knowledge(&items, "cancelar assinatura", None, 5, &weights);

        assert_eq!(result.items[0].item.title, "Como cancelar minha assinatura?");
        assert_eq!(result.search_terms, vec!["cancelar", "assinatura"]);
        assert_eq!(result.total_found, result.items.len());
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let query = "pagamento boleto";
        let result = search_knowledge(&items, query, Some("financeiro"), 5, &weights);
        assert!(!result.items.is_empty());
        assert!(result.items.iter().all(|s| s.item.category == "Financeiro"));

        let none = search_knowledge(&items, query, Some("Inexistente"), 5, &weights);
        assert!(none.items.is_empty());
        assert_eq!(none.search_terms, vec!["pagamento", "boleto"]);
    }

    #[test]
    fn test_zero_limit_keeps_terms() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let result = search_knowledge(&items, "cancelar assinatura", None, 0, &weights);
        assert!(result.items.is_empty());
        assert_eq!(result.total_found, 0);
        assert_eq!(result.search_terms, vec!["cancelar", "assinatura"]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let items = vec![
            item(30, "Pix", "a", "Financeiro", &[]),
            item(10, "Pix", "b", "Financeiro", &[]),
            item(20, "Pix", "c", "Financeiro", &[]),
        ];
        let result = search_knowledge(&items, "pix", None, 5, &ScoringWeights::default());
        let ids: Vec<i64> = result.items.iter().map(|s| s.item.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_custom_weights_change_ranking() {
        let items = vec![
            item(1, "Pix", "x", "Financeiro", &[]),
            item(2, "x", "y", "Financeiro", &["pix"]),
        ];
        let weights = ScoringWeights {
            title: 1,
            keyword: 50,
            content: 5,
            whole_word: 0,
        };
        let result = search_knowledge(&items, "pix", None, 5, &weights);
        assert_eq!(result.items[0].item.id, 2);
        assert_eq!(result.items[0].relevance_score, 50);
    }

    #[test]
    fn test_regex_metacharacters_in_tokens_are_literal() {
        let items = vec![item(1, "Plano (anual)", "x", "Vendas", &[])];
        let result = search_knowledge(&items, "(anual)", None, 5, &ScoringWeights::default());
        assert_eq!(result.items.len(), 1);
    }
}
