//! Renders search results into a prompt fragment for the completion API.
//!
//! The output is plain text meant to be appended to a system prompt. An empty
//! result renders as an empty string so callers can leave the block out.

use super::knowledge_models::SearchResult;

const CONTEXT_HEADING: &str = "=== BASE DE CONHECIMENTO RELEVANTE ===";

const CONTEXT_INSTRUCTIONS: &str = "INSTRUÇÕES:
- Use apenas as informações da base de conhecimento acima para responder
- Se não tiver certeza da resposta, diga isso claramente
- Cite a fonte (título do item) sempre que possível
- Seja preciso e objetivo";

/// Builds the context fragment for `result`, or `""` when it has no items.
///
/// # Example Output
/// ```text
/// === BASE DE CONHECIMENTO RELEVANTE ===
///
/// [1] Preços e Planos (DOCUMENT) - Categoria: Vendas
/// Oferecemos três planos...
///
/// INSTRUÇÕES:
/// ...
/// ```
pub fn build_ai_context(result: &SearchResult) -> String {
    if result.items.is_empty() {
        return String::new();
    }

    let mut context = String::from(CONTEXT_HEADING);
    context.push_str("\n\n");

    for (index, scored) in result.items.iter().enumerate() {
        let item = &scored.item;
        context.push_str(&format!(
            "[{}] {} ({}) - Categoria: {}\n{}\n\n",
            index + 1,
            item.title,
            item.item_type.as_str().to_uppercase(),
            item.category,
            item.content
        ));
    }

    context.push_str(CONTEXT_INSTRUCTIONS);
    context
}
