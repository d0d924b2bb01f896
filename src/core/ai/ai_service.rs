use super::intent::{infer_agent_type, wants_human};
use super::models::{AiConfig, AiMessage, AiReply};
use crate::core::knowledge::{build_ai_context, AgentType, KnowledgeBase, SnapshotStore};
use async_trait::async_trait;
use std::error::Error;
use std::sync::Arc;

/// Shown to the customer when the completion API fails.
pub const FALLBACK_REPLY: &str = "Desculpe, estou com dificuldades para responder agora. \
     Vou transferir você para um de nossos atendentes.";

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request and returns the reply text.
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}

// Blanket implementation for Box<dyn AiProvider>
// This allows main to decide at runtime which provider to wire in.
#[async_trait]
impl AiProvider for Box<dyn AiProvider> {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        // Delegate to the inner provider
        (**self).chat_complete(messages, config).await
    }
}

/// Persona instructions placed at the top of the system prompt.
pub fn persona_prompt(agent: AgentType) -> &'static str {
    match agent {
        AgentType::Sdr => {
            "Você é um SDR da EduChat. Seu objetivo é entender a necessidade do cliente, \
             qualificar o lead e apresentar os benefícios da plataforma. Seja cordial e \
             faça perguntas abertas."
        }
        AgentType::Closer => {
            "Você é um closer da EduChat. Seu objetivo é esclarecer dúvidas sobre planos, \
             preços e pagamento e conduzir o cliente ao fechamento. Seja claro e objetivo."
        }
        AgentType::Support => {
            "Você é do suporte da EduChat. Seu objetivo é resolver o problema do cliente \
             com instruções passo a passo. Seja paciente e empático."
        }
    }
}

/// Builds the full system prompt: persona, then the knowledge context if any.
pub fn build_system_prompt(agent: AgentType, context: &str) -> String {
    if context.is_empty() {
        persona_prompt(agent).to_string()
    } else {
        format!("{}\n\n{}", persona_prompt(agent), context)
    }
}

/// Generates replies grounded in the knowledge base.
pub struct AiService<P: AiProvider, S: SnapshotStore> {
    provider: P,
    knowledge: Arc<KnowledgeBase<S>>,
    config: AiConfig,
}

impl<P: AiProvider, S: SnapshotStore> AiService<P, S> {
    pub fn new(provider: P, knowledge: Arc<KnowledgeBase<S>>, config: AiConfig) -> Self {
        Self {
            provider,
            knowledge,
            config,
        }
    }

    /// Answers `message` as `agent`, or as the inferred agent when `None`.
    ///
    /// Provider errors are returned as-is; there is no retry.
    pub async fn respond(
        &self,
        message: &str,
        agent: Option<AgentType>,
    ) -> Result<AiReply, Box<dyn Error + Send + Sync>> {
        let agent = agent.unwrap_or_else(|| infer_agent_type(message));
        let result = self.knowledge.smart_search(message, agent).await;
        let context = build_ai_context(&result);

        let messages = vec![
            AiMessage::system(build_system_prompt(agent, &context)),
            AiMessage::user(message),
        ];

        let text = self.provider.chat_complete(&messages, &self.config).await?;

        Ok(AiReply {
            text: text.trim().to_string(),
            agent,
            transfer_to_human: wants_human(message),
            context_items: result.total_found,
        })
    }

    /// Like `respond`, but a provider failure becomes the fallback reply with
    /// a transfer to a human.
    pub async fn respond_or_fallback(&self, message: &str, agent: Option<AgentType>) -> AiReply {
        match self.respond(message, agent).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("AI error: {}", e);
                AiReply {
                    text: FALLBACK_REPLY.to_string(),
                    agent: agent.unwrap_or_else(|| infer_agent_type(message)),
                    transfer_to_human: true,
                    context_items: 0,
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge::{ScoringWeights, DEFAULT_KNOWLEDGE_KEY};
    use crate::infra::knowledge::InMemorySnapshotStore;
    use std::sync::Mutex;

    /// Records the prompts it receives and answers with a canned reply.
    #[derive(Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<Vec<AiMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl AiProvider for RecordingProvider {
        async fn chat_complete(
            &self,
            messages: &[AiMessage],
            _config: &AiConfig,
        ) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err("upstream unavailable".into());
            }
            Ok("  Nossos planos começam em R$ 97/mês.  ".to_string())
        }
    }

    async fn knowledge() -> Arc<KnowledgeBase<InMemorySnapshotStore>> {
        let kb = KnowledgeBase::load(
            InMemorySnapshotStore::new(),
            DEFAULT_KNOWLEDGE_KEY,
            ScoringWeights::default(),
        )
        .await
        .unwrap();
        Arc::new(kb)
    }

    async fn recording_service() -> AiService<RecordingProvider, InMemorySnapshotStore> {
        AiService::new(
            RecordingProvider::default(),
            knowledge().await,
            AiConfig::default(),
        )
    }

    #[test]
    fn system_prompt_omits_empty_context() {
        assert_eq!(
            build_system_prompt(AgentType::Sdr, ""),
            persona_prompt(AgentType::Sdr)
        );
        let with_context = build_system_prompt(AgentType::Closer, "CTX");
        assert!(with_context.ends_with("\n\nCTX"));
    }

    #[tokio::test]
    async fn respond_grounds_prompt_in_knowledge() {
        let service = recording_service().await;

        let reply = service.respond("qual o preço do plano?", None).await.unwrap();

        assert_eq!(reply.text, "Nossos planos começam em R$ 97/mês.");
        assert_eq!(reply.agent, AgentType::Sdr);
        assert!(!reply.transfer_to_human);
        assert!(reply.context_items >= 1);

        let seen = service.provider.seen.lock().unwrap();
        let system = &seen[0][0];
        assert_eq!(system.role, "system");
        assert!(system.content.starts_with(persona_prompt(AgentType::Sdr)));
        assert!(system.content.contains("Preços e Planos"));
        assert_eq!(seen[0][1], AiMessage::user("qual o preço do plano?"));
    }

    #[tokio::test]
    async fn explicit_agent_overrides_inference() {
        let service = recording_service().await;
        let reply = service
            .respond("qual o preço do plano?", Some(AgentType::Closer))
            .await
            .unwrap();
        assert_eq!(reply.agent, AgentType::Closer);
    }

    #[tokio::test]
    async fn no_context_means_persona_only_prompt() {
        let service = recording_service().await;
        let reply = service.respond("astronauta", None).await.unwrap();
        assert_eq!(reply.context_items, 0);

        let seen = service.provider.seen.lock().unwrap();
        assert_eq!(seen[0][0].content, persona_prompt(AgentType::Sdr));
    }

    #[tokio::test]
    async fn asking_for_a_person_sets_transfer_flag() {
        let service = recording_service().await;
        let reply = service
            .respond("quero falar com um atendente", None)
            .await
            .unwrap();
        assert!(reply.transfer_to_human);
    }

    #[tokio::test]
    async fn provider_failure_is_returned_once_and_falls_back() {
        let provider = RecordingProvider {
            fail: true,
            ..Default::default()
        };
        let service = AiService::new(provider, knowledge().await, AiConfig::default());

        assert!(service.respond("preço", None).await.is_err());

        let reply = service.respond_or_fallback("preço", None).await;
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert!(reply.transfer_to_human);

        // One call per attempt, no retries.
        assert_eq!(service.provider.seen.lock().unwrap().len(), 2);
    }
}
