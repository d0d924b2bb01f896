use super::knowledge_models::{KnowledgeItem, KnowledgeItemType};

fn seed(
    id: i64,
    item_type: KnowledgeItemType,
    title: &str,
    content: &str,
    category: &str,
    keywords: &[&str],
) -> KnowledgeItem {
    KnowledgeItem {
        id,
        item_type,
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// Knowledge installed when no snapshot exists yet.
pub fn default_items() -> Vec<KnowledgeItem> {
    vec![
        seed(
            1,
            KnowledgeItemType::Faq,
            "Como cancelar minha assinatura?",
            "Para cancelar sua assinatura, acesse Configurações > Assinatura e clique em \
             Cancelar. O cancelamento vale a partir do próximo ciclo de cobrança e o acesso \
             continua liberado até o fim do período já pago.",
            "Financeiro",
            &["cancelar", "cancelamento", "assinatura", "encerrar"],
        ),
        seed(
            2,
            KnowledgeItemType::Document,
            "Preços e Planos",
            "Oferecemos três planos: Básico (R$ 97/mês), Profissional (R$ 197/mês) e \
             Enterprise (sob consulta). Todos incluem acesso à plataforma e atualizações.",
            "Vendas",
            &["preço", "preços", "plano", "planos", "valor", "mensalidade"],
        ),
        seed(
            3,
            KnowledgeItemType::Faq,
            "Horário de atendimento",
            "Nosso time atende de segunda a sexta, das 8h às 18h, e aos sábados das 9h às \
             13h, pelo WhatsApp, e-mail e chat do site.",
            "Atendimento",
            &["horário", "atendimento", "contato", "suporte"],
        ),
        seed(
            4,
            KnowledgeItemType::Document,
            "Funcionalidades da plataforma",
            "A plataforma reúne inbox multicanal (WhatsApp, Instagram, Facebook e e-mail), \
             CRM com pipeline de vendas, copiloto de IA e relatórios de desempenho.",
            "Produto",
            &["funcionalidades", "recursos", "crm", "inbox", "relatórios"],
        ),
        seed(
            5,
            KnowledgeItemType::Faq,
            "Formas de pagamento",
            "Aceitamos cartão de crédito em até 12x, boleto bancário e Pix. Planos anuais \
             têm 15% de desconto no pagamento à vista.",
            "Financeiro",
            &["pagamento", "cartão", "boleto", "pix", "parcelamento"],
        ),
    ]
}
