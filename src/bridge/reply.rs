use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplyType {
    Text,
    Voice,
    Image,
    ImageUrl,
    Info,
    Error,
}

impl fmt::Display for ReplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "TEXT",
            Self::Voice => "VOICE",
            Self::Image => "IMAGE",
            Self::ImageUrl => "IMAGE_URL",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// What a bot hands back to the host for delivery.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub kind: ReplyType,
    pub content: String,
}

impl Reply {
    pub fn new(kind: ReplyType, content: &str) -> Self {
        Self {
            kind,
            content: content.to_string(),
        }
    }

    pub fn text(content: &str) -> Self {
        Self::new(ReplyType::Text, content)
    }

    pub fn error(content: &str) -> Self {
        Self::new(ReplyType::Error, content)
    }

    pub fn is_error(&self) -> bool {
        self.kind == ReplyType::Error
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reply(type={}, content={})", self.kind, self.content)
    }
}
