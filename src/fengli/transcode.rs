//! Session transcript to (query, history) conversion.

use serde::Serialize;

use super::error::FengliError;
use crate::session::{Message, Role};

#[derive(Clone, Serialize, Debug, PartialEq)]
pub enum EntryType {
    #[serde(rename = "answer")]
    Answer,
}

/// One prior turn in the shape the fengli service understands.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct HistoryEntry {
    pub role: Role,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<EntryType>,
    pub content: String,
    pub content_type: String,
}

impl HistoryEntry {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            r#type: None,
            content: content.to_string(),
            content_type: String::from("text"),
        }
    }

    pub fn answer(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            r#type: Some(EntryType::Answer),
            content: content.to_string(),
            content_type: String::from("text"),
        }
    }
}

/// Split a transcript into the latest user query and the turns before
/// it. System messages are dropped. The last remaining message must be
/// a non-empty user message.
pub fn convert_messages(messages: &[Message]) -> Result<(String, Vec<HistoryEntry>), FengliError> {
    let mut history: Vec<HistoryEntry> = messages
        .iter()
        .filter_map(|msg| match msg.role {
            Role::User => Some(HistoryEntry::user(&msg.content)),
            Role::Assistant => Some(HistoryEntry::answer(&msg.content)),
            Role::System => None,
        })
        .collect();

    let query = match history.pop() {
        Some(last) if last.role == Role::User && !last.content.is_empty() => last.content,
        _ => {
            return Err(FengliError::InvalidTranscript(String::from(
                "no user message",
            )));
        }
    };

    tracing::debug!("[FENGLI] converted history: {:?}", history);
    tracing::debug!("[FENGLI] user content as query: {}", query);
    Ok((query, history))
}
