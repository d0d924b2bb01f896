// Console layer - an interactive stand-in for the inbox UI.
//
// Reads lines from stdin, turns them into `ConsoleCommand`s and drives the
// core services. All formatting happens here; the core never prints.

#[path = "commands.rs"]
pub mod commands;

use crate::core::ai::{infer_agent_type, AiProvider, AiService};
use crate::core::chat::{group_messages_by_day, ChatMessage, Locale};
use crate::core::inbox::{Channel, ConversationFeed};
use crate::core::knowledge::{
    build_ai_context, AgentType, KnowledgeBase, KnowledgeItem, SearchResult, SnapshotStore,
};
use chrono::Utc;
use chrono_tz::Tz;
use commands::{parse_command, ConsoleCommand, HELP_TEXT};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Conversations shown per `/inbox` or `/more`.
const INBOX_PAGE_SIZE: usize = 10;

/// Result of handling one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub quit: bool,
}

impl Outcome {
    fn print(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            quit: false,
        }
    }
}

/// State of one console session.
pub struct ConsoleSession<S: SnapshotStore> {
    knowledge: Arc<KnowledgeBase<S>>,
    /// `None` runs in context-only mode.
    ai: Option<AiService<Box<dyn AiProvider>, S>>,
    pinned_agent: Option<AgentType>,
    history: Vec<ChatMessage>,
    feed: ConversationFeed,
    feed_channel: Option<Channel>,
    feed_cursor: Option<usize>,
    timezone: Tz,
    locale: Locale,
}

impl<S: SnapshotStore> ConsoleSession<S> {
    pub fn new(
        knowledge: Arc<KnowledgeBase<S>>,
        ai: Option<AiService<Box<dyn AiProvider>, S>>,
        feed: ConversationFeed,
        timezone: Tz,
        locale: Locale,
    ) -> Self {
        Self {
            knowledge,
            ai,
            pinned_agent: None,
            history: Vec::new(),
            feed,
            feed_channel: None,
            feed_cursor: None,
            timezone,
            locale,
        }
    }

    /// Reads commands from `input` until EOF or `/quit`.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> std::io::Result<()> {
        let mut lines = input.lines();
        println!("{HELP_TEXT}");

        while let Some(line) = lines.next_line().await? {
            let outcome = self.handle_line(&line).await;
            if !outcome.output.is_empty() {
                println!("{}", outcome.output);
            }
            if outcome.quit {
                break;
            }
        }

        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        match parse_command(line) {
            Ok(command) => self.handle(command).await,
            Err(message) => Outcome::print(message),
        }
    }

    async fn handle(&mut self, command: ConsoleCommand) -> Outcome {
        match command {
            ConsoleCommand::Empty => Outcome::print(""),
            ConsoleCommand::Help => Outcome::print(HELP_TEXT),
            ConsoleCommand::Quit => Outcome {
                output: "Até logo!".to_string(),
                quit: true,
            },
            ConsoleCommand::Message(text) => Outcome::print(self.answer(&text).await),
            ConsoleCommand::Agent(agent) => {
                self.pinned_agent = agent;
                match agent {
                    Some(agent) => Outcome::print(format!("Agente fixado: {agent}")),
                    None => Outcome::print("Agente inferido automaticamente"),
                }
            }
            ConsoleCommand::Search(query) => {
                let result = self.knowledge.search_knowledge(&query, None, None).await;
                Outcome::print(format_search(&result))
            }
            ConsoleCommand::Category(category) => {
                let items = self.knowledge.get_by_category(&category).await;
                Outcome::print(format_items(&items))
            }
            ConsoleCommand::List => Outcome::print(format_items(&self.knowledge.get_all().await)),
            ConsoleCommand::Add(item) => match self.knowledge.add(item).await {
                Ok(item) => Outcome::print(format!("Item {} adicionado", item.id)),
                Err(e) => Outcome::print(format!("Item adicionado só em memória: {e}")),
            },
            ConsoleCommand::Edit(id, patch) => match self.knowledge.update(id, patch).await {
                Ok(true) => Outcome::print(format!("Item {id} atualizado")),
                Ok(false) => Outcome::print(format!("Item {id} não encontrado")),
                Err(e) => Outcome::print(format!("Item atualizado só em memória: {e}")),
            },
            ConsoleCommand::Delete(id) => match self.knowledge.delete(id).await {
                Ok(true) => Outcome::print(format!("Item {id} removido")),
                Ok(false) => Outcome::print(format!("Item {id} não encontrado")),
                Err(e) => Outcome::print(format!("Item removido só em memória: {e}")),
            },
            ConsoleCommand::History => Outcome::print(self.format_history()),
            ConsoleCommand::Inbox(channel) => {
                self.feed_channel = channel;
                self.feed_cursor = None;
                let page = self.next_feed_page();
                if self.feed.is_empty() {
                    return Outcome::print(page);
                }
                let unread = self.feed.unread_total(channel);
                Outcome::print(format!("{page}\nNão lidas: {unread}"))
            }
            ConsoleCommand::More => Outcome::print(self.next_feed_page()),
        }
    }

    /// Answers a customer message with the AI service, or shows the context
    /// that would ground the answer when no API key is configured.
    async fn answer(&mut self, text: &str) -> String {
        self.record("Cliente", text);

        let Some(ai) = &self.ai else {
            let agent = self.pinned_agent.unwrap_or_else(|| infer_agent_type(text));
            let result = self.knowledge.smart_search(text, agent).await;
            let context = build_ai_context(&result);
            return if context.is_empty() {
                format!("[{agent}] Nenhum conhecimento relevante encontrado")
            } else {
                format!("[{agent}]\n{context}")
            };
        };

        let reply = ai.respond_or_fallback(text, self.pinned_agent).await;
        self.record(reply.agent.as_str(), &reply.text);

        let mut output = format!("[{}] {}", reply.agent, reply.text);
        if reply.transfer_to_human {
            output.push_str("\n→ Transferindo para um atendente humano");
        }
        output
    }

    fn record(&mut self, author: &str, content: &str) {
        let id = self.history.len() as u64 + 1;
        self.history.push(ChatMessage {
            id,
            author: author.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
        });
    }

    fn format_history(&self) -> String {
        let groups = group_messages_by_day(&self.history, Utc::now(), self.timezone, self.locale);
        if groups.is_empty() {
            return "Nenhuma mensagem nesta sessão".to_string();
        }

        let mut out = Vec::new();
        for group in groups {
            out.push(format!("── {} ──", group.label));
            for message in group.messages {
                let time = message.sent_at.with_timezone(&self.timezone).format("%H:%M");
                out.push(format!("{time} {}: {}", message.author, message.content));
            }
        }
        out.join("\n")
    }

    fn next_feed_page(&mut self) -> String {
        if self.feed.is_empty() {
            return "Nenhuma conversa carregada".to_string();
        }

        let page = self
            .feed
            .page(self.feed_cursor, INBOX_PAGE_SIZE, self.feed_channel);
        self.feed_cursor = page.next_cursor;

        if page.items.is_empty() {
            return "Fim da lista de conversas".to_string();
        }

        let mut lines: Vec<String> = page
            .items
            .iter()
            .map(|c| {
                format!(
                    "#{} [{}] {} ({} não lidas) - {}",
                    c.id, c.channel, c.contact_name, c.unread_count, c.last_message_preview
                )
            })
            .collect();
        if page.has_more {
            lines.push("... use /more para carregar mais".to_string());
        } else {
            // Nothing left; another /more reports the end.
            self.feed_cursor = Some(usize::MAX);
        }
        lines.join("\n")
    }
}

fn format_items(items: &[KnowledgeItem]) -> String {
    if items.is_empty() {
        return "Nenhum item".to_string();
    }
    items
        .iter()
        .map(|item| {
            format!(
                "#{} [{}] {} ({}) - {}",
                item.id,
                item.category,
                item.title,
                item.item_type,
                item.keywords.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_search(result: &SearchResult) -> String {
    if result.items.is_empty() {
        return format!("Nenhum resultado para {:?}", result.search_terms);
    }
    result
        .items
        .iter()
        .map(|scored| {
            format!(
                "{:>3} pts  #{} {} [{}]",
                scored.relevance_score, scored.item.id, scored.item.title, scored.item.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
