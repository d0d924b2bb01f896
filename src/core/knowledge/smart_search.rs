//! Category-biased search for a conversational role.
//!
//! Each agent type only wants knowledge from a few categories. The search
//! ranks everything first, keeps the best items from the allowed categories
//! and, when none qualify, falls back to the best unrestricted matches so the
//! caller never ends up without context while relevant items exist.

use super::knowledge_models::{KnowledgeItem, SearchResult};
use super::scoring::{category_matches, search_knowledge, ScoringWeights};
use std::fmt;
use std::str::FromStr;

/// How many ranked items are fetched before category filtering.
const CANDIDATE_LIMIT: usize = 10;
/// How many items a smart search returns.
const SMART_RESULT_LIMIT: usize = 3;

/// The conversational role currently answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentType {
    /// Sales development: qualifies leads.
    Sdr,
    /// Closes deals, handles payment questions.
    Closer,
    Support,
}

impl AgentType {
    pub const ALL: [AgentType; 3] = [AgentType::Sdr, AgentType::Closer, AgentType::Support];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Sdr => "sdr",
            AgentType::Closer => "closer",
            AgentType::Support => "support",
        }
    }

    /// Categories this agent draws knowledge from.
    pub fn allowed_categories(&self) -> &'static [&'static str] {
        match self {
            AgentType::Sdr => &["Vendas", "Produto"],
            AgentType::Closer => &["Vendas", "Financeiro", "Produto"],
            AgentType::Support => &["Atendimento", "Produto", "Suporte"],
        }
    }

    pub fn allows(&self, category: &str) -> bool {
        self.allowed_categories()
            .iter()
            .any(|allowed| category_matches(category, allowed))
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sdr" => Ok(AgentType::Sdr),
            "closer" => Ok(AgentType::Closer),
            "support" => Ok(AgentType::Support),
            other => Err(format!("unknown agent type: {other}")),
        }
    }
}

/// Searches `items` for `message`, biased towards the agent's categories.
pub fn smart_search(
    items: &[KnowledgeItem],
    message: &str,
    agent: AgentType,
    weights: &ScoringWeights,
) -> SearchResult {
    let ranked = search_knowledge(items, message, None, CANDIDATE_LIMIT, weights);
    let search_terms = ranked.search_terms;

    let allowed: Vec<_> = ranked
        .items
        .into_iter()
        .filter(|scored| agent.allows(&scored.item.category))
        .take(SMART_RESULT_LIMIT)
        .collect();

    if !allowed.is_empty() {
        return SearchResult::new(allowed, search_terms);
    }

    tracing::debug!(agent = %agent, "No knowledge in allowed categories, falling back");
    search_knowledge(items, message, None, SMART_RESULT_LIMIT, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge::knowledge_models::KnowledgeItemType;
    use crate::core::knowledge::seed::default_items;

    fn faq(id: i64, title: &str, category: &str) -> KnowledgeItem {
        KnowledgeItem {
            id,
            item_type: KnowledgeItemType::Faq,
            title: title.to_string(),
            content: String::new(),
            category: category.to_string(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn sdr_only_gets_sales_and_product_items() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let result = smart_search(&items, "qual o preço do plano?", AgentType::Sdr, &weights);

        assert!(!result.items.is_empty());
        assert!(result
            .items
            .iter()
            .all(|s| ["Vendas", "Produto"].contains(&s.item.category.as_str())));
        assert!(result.items.iter().any(|s| s.item.title == "Preços e Planos"));
    }

    #[test]
    fn support_falls_back_to_unrestricted_results() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let query = "formas de pagamento boleto";
        let result = smart_search(&items, query, AgentType::Support, &weights);

        assert!(!result.items.is_empty());
        assert_eq!(result.items[0].item.title, "Formas de pagamento");
        assert_eq!(result.items[0].item.category, "Financeiro");
    }

    #[test]
    fn keeps_at_most_three_allowed_items_in_rank_order() {
        let items: Vec<KnowledgeItem> = (1..=6).map(|id| faq(id, "Pix", "Vendas")).collect();
        let result = smart_search(&items, "pix", AgentType::Closer, &ScoringWeights::default());

        let ids: Vec<i64> = result.items.iter().map(|s| s.item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result.total_found, 3);
    }

    #[test]
    fn allowed_items_beyond_the_candidate_window_are_not_considered() {
        // Ten strong matches outside the allowed set push the weak allowed one out.
        let mut items: Vec<KnowledgeItem> = (1..=10)
            .map(|id| faq(id, "Boleto boleto", "Financeiro"))
            .collect();
        let mut weak = faq(11, "x", "Atendimento");
        weak.content = "boleto".to_string();
        items.push(weak);

        let weights = ScoringWeights::default();
        let result = smart_search(&items, "boleto", AgentType::Support, &weights);
        let ids: Vec<i64> = result.items.iter().map(|s| s.item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn no_match_anywhere_is_empty() {
        let items = default_items();
        let weights = ScoringWeights::default();
        let result = smart_search(&items, "astronauta", AgentType::Sdr, &weights);
        assert!(result.items.is_empty());
        assert_eq!(result.search_terms, vec!["astronauta"]);
    }

    #[test]
    fn agent_type_round_trips_through_its_tag() {
        for agent in AgentType::ALL {
            assert_eq!(agent.as_str().parse::<AgentType>(), Ok(agent));
        }
        assert!("manager".parse::<AgentType>().is_err());
    }

    #[test]
    fn category_allow_list_ignores_case() {
        assert!(AgentType::Support.allows("suporte"));
        assert!(!AgentType::Sdr.allows("Financeiro"));
    }
}
