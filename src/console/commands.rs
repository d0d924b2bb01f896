// Console command parsing.
//
// Lines starting with `/` are commands, anything else is a customer message.
// Parsing is kept free of I/O so every command shape can be unit tested.

use crate::core::inbox::Channel;
use crate::core::knowledge::{AgentType, KnowledgeItemPatch, KnowledgeItemType, NewKnowledgeItem};

pub const HELP_TEXT: &str = "Comandos:
  <mensagem>                 responde como o agente atual (ou inferido)
  /agent <sdr|closer|support|auto>
  /search <consulta>         busca na base de conhecimento
  /category <nome>           lista itens de uma categoria
  /list                      lista toda a base de conhecimento
  /add <tipo> | <categoria> | <título> | <conteúdo> | <kw1,kw2>
  /edit <id> | campo=valor [| campo=valor]   campos: tipo, categoria, titulo, conteudo, keywords
  /delete <id>
  /history                   mensagens desta sessão agrupadas por dia
  /inbox [canal]             primeira página de conversas
  /more                      próxima página de conversas
  /help
  /quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Message(String),
    /// `None` switches back to inference.
    Agent(Option<AgentType>),
    Search(String),
    Category(String),
    List,
    Add(NewKnowledgeItem),
    Edit(i64, KnowledgeItemPatch),
    Delete(i64),
    History,
    Inbox(Option<Channel>),
    More,
    Help,
    Quit,
    Empty,
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("Uso: {usage}"))
    } else {
        Ok(arg)
    }
}

fn parse_add(arg: &str) -> Result<NewKnowledgeItem, String> {
    const USAGE: &str = "/add <tipo> | <categoria> | <título> | <conteúdo> | <kw1,kw2>";

    let parts: Vec<&str> = arg.split('|').map(str::trim).collect();
    if parts.len() < 4 || parts.len() > 5 || parts[..4].iter().any(|p| p.is_empty()) {
        return Err(format!("Uso: {USAGE}"));
    }

    let item_type: KnowledgeItemType = parts[0].parse()?;
    let keywords = parts.get(4).map(|raw| split_keywords(raw)).unwrap_or_default();

    Ok(NewKnowledgeItem {
        item_type,
        category: parts[1].to_string(),
        title: parts[2].to_string(),
        content: parts[3].to_string(),
        keywords,
    })
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse().map_err(|_| format!("Id inválido: {raw}"))
}

fn parse_edit(arg: &str) -> Result<(i64, KnowledgeItemPatch), String> {
    const USAGE: &str = "/edit <id> | campo=valor [| campo=valor]";

    let mut parts = arg.split('|').map(str::trim);
    let id = parse_id(required(parts.next().unwrap_or_default(), USAGE)?)?;

    let mut patch = KnowledgeItemPatch::default();
    let mut changed = false;
    for assignment in parts {
        let Some((field, value)) = assignment.split_once('=') else {
            return Err(format!("Uso: {USAGE}"));
        };
        let value = value.trim();
        match field.trim().to_lowercase().as_str() {
            "tipo" | "type" => patch.item_type = Some(value.parse()?),
            "categoria" | "category" => patch.category = Some(value.to_string()),
            "titulo" | "título" | "title" => patch.title = Some(value.to_string()),
            "conteudo" | "conteúdo" | "content" => patch.content = Some(value.to_string()),
            "keywords" => patch.keywords = Some(split_keywords(value)),
            other => return Err(format!("Campo desconhecido: {other}")),
        }
        changed = true;
    }

    if !changed {
        return Err(format!("Uso: {USAGE}"));
    }
    Ok((id, patch))
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleCommand::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ConsoleCommand::Message(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "agent" => match required(arg, "/agent <sdr|closer|support|auto>")? {
            "auto" => Ok(ConsoleCommand::Agent(None)),
            tag => Ok(ConsoleCommand::Agent(Some(tag.parse()?))),
        },
        "search" => Ok(ConsoleCommand::Search(
            required(arg, "/search <consulta>")?.to_string(),
        )),
        "category" => Ok(ConsoleCommand::Category(
            required(arg, "/category <nome>")?.to_string(),
        )),
        "list" => Ok(ConsoleCommand::List),
        "add" => Ok(ConsoleCommand::Add(parse_add(arg)?)),
        "edit" => {
            let (id, patch) = parse_edit(arg)?;
            Ok(ConsoleCommand::Edit(id, patch))
        }
        "delete" => Ok(ConsoleCommand::Delete(parse_id(required(arg, "/delete <id>")?)?)),
        "history" => Ok(ConsoleCommand::History),
        "inbox" if arg.is_empty() => Ok(ConsoleCommand::Inbox(None)),
        "inbox" => Ok(ConsoleCommand::Inbox(Some(arg.parse()?))),
        "more" => Ok(ConsoleCommand::More),
        "help" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        other => Err(format!("Comando desconhecido: /{other}. Use /help.")),
    }
}
