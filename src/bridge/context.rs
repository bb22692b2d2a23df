use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Kind of inbound message the host hands to a bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextType {
    Text,
    Voice,
    Image,
    File,
    Video,
    Sharing,
    ImageCreate,
    AcceptFriend,
    JoinGroup,
    Patpat,
    Function,
    ExitGroup,
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "TEXT",
            Self::Voice => "VOICE",
            Self::Image => "IMAGE",
            Self::File => "FILE",
            Self::Video => "VIDEO",
            Self::Sharing => "SHARING",
            Self::ImageCreate => "IMAGE_CREATE",
            Self::AcceptFriend => "ACCEPT_FRIEND",
            Self::JoinGroup => "JOIN_GROUP",
            Self::Patpat => "PATPAT",
            Self::Function => "FUNCTION",
            Self::ExitGroup => "EXIT_GROUP",
        };
        f.write_str(name)
    }
}

/// Routing information for a single inbound message.
///
/// `session_id` is always present. Anything else the host wants to
/// pass along lives in `kwargs` and can be read with `context["key"]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub kind: ContextType,
    pub session_id: String,
    #[serde(default)]
    pub kwargs: HashMap<String, String>,
}

impl Context {
    pub fn new(kind: ContextType, session_id: &str) -> Self {
        Self {
            kind,
            session_id: session_id.to_string(),
            kwargs: HashMap::new(),
        }
    }

    pub fn text(session_id: &str) -> Self {
        Self::new(ContextType::Text, session_id)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.kwargs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        if key == "session_id" {
            return Some(&self.session_id);
        }
        self.kwargs.get(key).map(String::as_str)
    }
}

impl Index<&str> for Context {
    type Output = str;

    /// Panics when the key is missing, same as indexing a `HashMap`.
    fn index(&self, key: &str) -> &str {
        match self.get(key) {
            Some(value) => value,
            None => panic!("context has no key `{key}`"),
        }
    }
}
