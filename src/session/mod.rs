//! Conversation state owned by the host.
//!
//! Backends only read a `Session` snapshot and report replies back
//! through `SessionStore`; they never mutate stored sessions directly.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::core::BotConfig;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }

    pub fn system(content: &str) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub session_id: String,
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<Message>,
    pub total_tokens: u64,
}

impl Session {
    /// A fresh session. The system prompt is only recorded as a message
    /// when it is non-empty.
    pub fn new(session_id: &str, model: &str, system_prompt: &str) -> Self {
        let mut session = Session {
            session_id: session_id.to_string(),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            messages: vec![],
            total_tokens: 0,
        };
        session.reset();
        session
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.total_tokens = 0;
        if !self.system_prompt.is_empty() {
            self.messages.push(Message::system(&self.system_prompt));
        }
    }

    pub fn add_query(&mut self, query: &str) {
        self.messages.push(Message::user(query));
    }

    pub fn add_reply(&mut self, reply: &str) {
        self.messages.push(Message::assistant(reply));
    }

    /// Drop the oldest non-system messages until at most `max_history`
    /// remain. System messages are never discarded.
    pub fn discard_exceeding(&mut self, max_history: usize) -> usize {
        let non_system = self
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .count();
        let mut to_drop = non_system.saturating_sub(max_history);
        let dropped = to_drop;
        self.messages.retain(|m| {
            if to_drop > 0 && m.role != Role::System {
                to_drop -= 1;
                false
            } else {
                true
            }
        });
        dropped
    }
}

/// Host-side session bookkeeping a backend relies on.
pub trait SessionStore {
    /// Fetch or create the session, append `query` as a user message and
    /// return a snapshot of the updated transcript.
    fn session_query(&self, query: &str, session_id: &str) -> Session;

    /// Append the assistant's reply and record token usage.
    fn session_reply(&self, content: &str, session_id: &str, total_tokens: u64);

    fn clear_session(&self, session_id: &str);

    fn clear_all_sessions(&self);
}

/// Process-local `SessionStore` keyed by session id.
#[derive(Debug)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, Session>>,
    model: String,
    system_prompt: String,
    max_history: usize,
}

impl InMemorySessions {
    pub fn new(model: &str, system_prompt: &str, max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            model: model.to_string(),
            system_prompt: system_prompt.to_string(),
            max_history,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(&config.model, &config.character_desc, config.max_history)
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.lock().get(session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock leaves the map usable; every
    // mutation is a single push or retain.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_session(&self, session_id: &str) -> Session {
        Session::new(session_id, &self.model, &self.system_prompt)
    }
}

impl Default for InMemorySessions {
    fn default() -> Self {
        Self::from_config(&BotConfig::default())
    }
}

impl SessionStore for InMemorySessions {
    fn session_query(&self, query: &str, session_id: &str) -> Session {
        let mut sessions = self.lock();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| self.new_session(session_id));
        session.add_query(query);
        // Failed turns never reach `session_reply`, so trim here as well.
        // The new query always survives.
        trim_history(session, self.max_history.max(1));
        session.clone()
    }

    fn session_reply(&self, content: &str, session_id: &str, total_tokens: u64) {
        let mut sessions = self.lock();
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| self.new_session(session_id));
        session.add_reply(content);
        session.total_tokens = total_tokens;
        trim_history(session, self.max_history);
    }

    fn clear_session(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    fn clear_all_sessions(&self) {
        self.lock().clear();
    }
}

fn trim_history(session: &mut Session, max_history: usize) {
    let dropped = session.discard_exceeding(max_history);
    if dropped > 0 {
        tracing::debug!(
            "Discarded {} old messages from session {}",
            dropped,
            session.session_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }

    #[test]
    fn test_new_session_seeds_system_prompt() {
        let session = Session::new("s1", "fengli", "You are Fengli.");
        assert_eq!(session.messages, vec![Message::system("You are Fengli.")]);

        let bare = Session::new("s2", "fengli", "");
        assert!(bare.messages.is_empty());
    }

    #[test]
    fn test_discard_exceeding_keeps_system_and_newest() {
        let mut session = Session::new("s1", "fengli", "sys");
        session.add_query("q1");
        session.add_reply("a1");
        session.add_query("q2");
        session.add_reply("a2");

        let dropped = session.discard_exceeding(2);

        assert_eq!(dropped, 2);
        assert_eq!(
            session.messages,
            vec![
                Message::system("sys"),
                Message::user("q2"),
                Message::assistant("a2"),
            ]
        );
    }

    #[test]
    fn test_session_query_creates_and_appends() {
        let store = InMemorySessions::new("fengli", "", 10);
        let first = store.session_query("hello", "s1");
        assert_eq!(first.messages, vec![Message::user("hello")]);

        store.session_reply("hi there", "s1", 100);
        let second = store.session_query("how are you", "s1");
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.total_tokens, 100);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = InMemorySessions::new("fengli", "", 10);
        store.session_query("a", "s1");
        store.session_query("b", "s2");

        assert_eq!(store.get("s1").unwrap().messages, vec![Message::user("a")]);
        assert_eq!(store.get("s2").unwrap().messages, vec![Message::user("b")]);
    }

    #[test]
    fn test_session_reply_trims_history() {
        let store = InMemorySessions::new("fengli", "", 2);
        store.session_query("q1", "s1");
        store.session_reply("a1", "s1", 100);
        store.session_query("q2", "s1");
        store.session_reply("a2", "s1", 100);

        let session = store.get("s1").unwrap();
        assert_eq!(
            session.messages,
            vec![Message::user("q2"), Message::assistant("a2")]
        );
    }

    #[test]
    fn test_unanswered_queries_respect_history_cap() {
        let store = InMemorySessions::new("fengli", "sys", 2);
        for i in 0..6 {
            store.session_query(&format!("q{i}"), "s1");
        }

        let session = store.get("s1").unwrap();
        assert_eq!(
            session.messages,
            vec![
                Message::system("sys"),
                Message::user("q4"),
                Message::user("q5"),
            ]
        );
    }

    #[test]
    fn test_zero_history_cap_keeps_latest_query() {
        let store = InMemorySessions::new("fengli", "", 0);
        store.session_query("q1", "s1");
        let session = store.session_query("q2", "s1");
        assert_eq!(session.messages, vec![Message::user("q2")]);
    }

    #[test]
    fn test_clear_sessions() {
        let store = InMemorySessions::default();
        store.session_query("a", "s1");
        store.session_query("b", "s2");

        store.clear_session("s1");
        assert!(store.get("s1").is_none());
        assert_eq!(store.len(), 1);

        store.clear_all_sessions();
        assert!(store.is_empty());
    }
}
