// Groups chat messages by calendar day for display.
//
// Days are computed in the configured time zone, not in UTC, so a message sent
// at 23:30 in São Paulo lands on that local day. Each group gets a label
// relative to "now": today, yesterday, a weekday name within the last week, or
// the plain date.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use std::str::FromStr;

/// A message in a conversation thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub author: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Messages sharing one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageGroup {
    pub date: NaiveDate,
    pub label: String,
    pub messages: Vec<ChatMessage>,
}

/// Language used for day labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    PtBr,
    EnUs,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Locale::PtBr),
            "en-us" | "en" => Ok(Locale::EnUs),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl Locale {
    fn today(&self) -> &'static str {
        match self {
            Locale::PtBr => "Hoje",
            Locale::EnUs => "Today",
        }
    }

    fn yesterday(&self) -> &'static str {
        match self {
            Locale::PtBr => "Ontem",
            Locale::EnUs => "Yesterday",
        }
    }

    fn weekday(&self, weekday: Weekday) -> &'static str {
        match self {
            Locale::PtBr => match weekday {
                Weekday::Mon => "segunda-feira",
                Weekday::Tue => "terça-feira",
                Weekday::Wed => "quarta-feira",
                Weekday::Thu => "quinta-feira",
                Weekday::Fri => "sexta-feira",
                Weekday::Sat => "sábado",
                Weekday::Sun => "domingo",
            },
            Locale::EnUs => match weekday {
                Weekday::Mon => "Monday",
                Weekday::Tue => "Tuesday",
                Weekday::Wed => "Wednesday",
                Weekday::Thu => "Thursday",
                Weekday::Fri => "Friday",
                Weekday::Sat => "Saturday",
                Weekday::Sun => "Sunday",
            },
        }
    }

    fn date_format(&self) -> &'static str {
        match self {
            Locale::PtBr => "%d/%m/%Y",
            Locale::EnUs => "%m/%d/%Y",
        }
    }
}

/// Label for `date` as seen from `today`.
pub fn day_label(date: NaiveDate, today: NaiveDate, locale: Locale) -> String {
    let days_ago = today.signed_duration_since(date).num_days();
    match days_ago {
        0 => locale.today().to_string(),
        1 => locale.yesterday().to_string(),
        2..=6 => locale.weekday(date.weekday()).to_string(),
        _ => date.format(locale.date_format()).to_string(),
    }
}

/// Buckets `messages` by local day in `tz`. Groups come out oldest first and
/// messages inside a group in send order.
pub fn group_messages_by_day(
    messages: &[ChatMessage],
    now: DateTime<Utc>,
    tz: Tz,
    locale: Locale,
) -> Vec<MessageGroup> {
    let today = now.with_timezone(&tz).date_naive();

    let mut sorted: Vec<&ChatMessage> = messages.iter().collect();
    sorted.sort_by_key(|m| (m.sent_at, m.id));

    let mut groups: Vec<MessageGroup> = Vec::new();
    for message in sorted {
        let date = message.sent_at.with_timezone(&tz).date_naive();
        match groups.last_mut() {
            Some(group) if group.date == date => group.messages.push(message.clone()),
            _ => groups.push(MessageGroup {
                date,
                label: day_label(date, today, locale),
                messages: vec![message.clone()],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn msg(id: u64, sent_at: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            author: "Cliente".to_string(),
            content: format!("mensagem {id}"),
            sent_at,
        }
    }

    #[test]
    fn test_labels_relative_to_today() {
        // 2024-05-15 is a Wednesday
        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();

        assert_eq!(day_label(day(15), today, Locale::PtBr), "Hoje");
        assert_eq!(day_label(day(14), today, Locale::PtBr), "Ontem");
        assert_eq!(day_label(day(13), today, Locale::PtBr), "segunda-feira");
        assert_eq!(day_label(day(9), today, Locale::EnUs), "Thursday");
        assert_eq!(day_label(day(8), today, Locale::PtBr), "08/05/2024");
        assert_eq!(day_label(day(8), today, Locale::EnUs), "05/08/2024");
        // Future dates fall back to the plain date
        assert_eq!(day_label(day(16), today, Locale::EnUs), "05/16/2024");
    }

    #[test]
    fn test_groups_by_local_day_not_utc_day() {
        let tz: Tz = "America/Sao_Paulo".parse().unwrap();
        let now = at(2024, 5, 15, 15, 0);

        // 01:30 UTC on the 15th is 22:30 on the 14th in São Paulo (UTC-3).
        let messages = vec![
            msg(2, at(2024, 5, 15, 12, 0)),
            msg(1, at(2024, 5, 15, 1, 30)),
            msg(3, at(2024, 5, 15, 13, 0)),
        ];

        let groups = group_messages_by_day(&messages, now, tz, Locale::PtBr);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "Ontem");
        assert_eq!(groups[0].messages.len(), 1);
        assert_eq!(groups[1].label, "Hoje");
        let ids: Vec<u64> = groups[1].messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        let groups = group_messages_by_day(&[], Utc::now(), chrono_tz::UTC, Locale::EnUs);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("pt_BR".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("en-US".parse::<Locale>(), Ok(Locale::EnUs));
        assert!("fr-FR".parse::<Locale>().is_err());
    }
}
