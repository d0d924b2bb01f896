// Agent-type inference.
//
// Picks which persona should answer a customer message using keyword
// heuristics. Support signals win over closing signals; anything else goes to
// the SDR, who qualifies the lead.

use crate::core::knowledge::AgentType;
use once_cell::sync::Lazy;
use regex::Regex;

const SUPPORT_SIGNALS: &[&str] = &[
    "problema",
    "erro",
    "não consigo",
    "nao consigo",
    "ajuda",
    "suporte",
    "bug",
    "acesso",
    "senha",
    "travou",
];

const CLOSER_SIGNALS: &[&str] = &[
    "pagamento",
    "boleto",
    "pix",
    "cartão",
    "cartao",
    "contrato",
    "desconto",
    "fechar",
    "parcel",
    "comprar",
    "assinar",
];

/// Phrases where the customer asks for a person instead of the assistant.
/// Whole words only, so "pessoal" in a greeting does not count.
static HUMAN_REQUEST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\b(humano|humana|atendente|pessoa)\b").ok(),
        Regex::new(r"(?i)\bfalar com algu[eé]m\b").ok(),
    ]
    .into_iter()
    .flatten()
    .collect()
});

fn contains_any(text: &str, signals: &[&str]) -> bool {
    signals.iter().any(|signal| text.contains(signal))
}

/// Chooses the persona for `message`.
pub fn infer_agent_type(message: &str) -> AgentType {
    let text = message.to_lowercase();

    if contains_any(&text, SUPPORT_SIGNALS) {
        AgentType::Support
    } else if contains_any(&text, CLOSER_SIGNALS) {
        AgentType::Closer
    } else {
        AgentType::Sdr
    }
}

/// Whether the customer explicitly asked to talk to a human.
pub fn wants_human(message: &str) -> bool {
    HUMAN_REQUEST_PATTERNS.iter().any(|re| re.is_match(message))
}
