use super::client::FengliClient;
use super::error::{FengliError, RetryError};
use super::retry::{RetryPolicy, with_retry};
use super::transcode::convert_messages;
use crate::bot::Bot;
use crate::bridge::{Context, ContextType, Reply};
use crate::core::BotConfig;
use crate::session::{InMemorySessions, Session, SessionStore};

/// Shown to the user whenever the backend gives up. Details only go
/// to the log.
pub const APOLOGY: &str = "我暂时遇到了一些问题，请您稍后重试~";

/// The service doesn't report usage so token counts are fixed.
pub const PLACEHOLDER_TOKENS: u64 = 100;

#[derive(Clone, Debug, PartialEq)]
pub struct ReplyContent {
    pub total_tokens: u64,
    pub completion_tokens: u64,
    pub content: String,
}

pub fn unsupported_type_message(kind: ContextType) -> String {
    format!("Bot不支持处理{}类型的消息", kind)
}

pub struct FengliBot<S: SessionStore = InMemorySessions> {
    sessions: S,
    client: FengliClient,
    retry: RetryPolicy,
}

impl FengliBot<InMemorySessions> {
    pub fn from_config(config: &BotConfig) -> Result<Self, FengliError> {
        Ok(Self::new(
            InMemorySessions::from_config(config),
            FengliClient::from_config(config)?,
            RetryPolicy::from_config(config),
        ))
    }
}

impl<S: SessionStore> FengliBot<S> {
    pub fn new(sessions: S, client: FengliClient, retry: RetryPolicy) -> Self {
        Self {
            sessions,
            client,
            retry,
        }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Transcode the session and ask the service, retrying the whole
    /// pipeline per the bot's policy.
    pub fn reply_text(&self, session: &Session) -> Result<ReplyContent, RetryError> {
        with_retry(&self.retry, |_| {
            // History is computed but the service only takes the query;
            // it is not added to the request body.
            let (query, _history) = convert_messages(&session.messages)?;
            let answer = self.client.send(&query)?;
            Ok(ReplyContent {
                total_tokens: PLACEHOLDER_TOKENS,
                completion_tokens: PLACEHOLDER_TOKENS,
                content: answer,
            })
        })
    }
}

impl<S: SessionStore> Bot for FengliBot<S> {
    fn reply(&self, query: &str, context: &Context) -> Reply {
        if context.kind != ContextType::Text {
            return Reply::error(&unsupported_type_message(context.kind));
        }

        tracing::info!("[FENGLI] query={}", query);
        let session_id = &context.session_id;
        let session = self.sessions.session_query(query, session_id);
        tracing::debug!("[FENGLI] session query={:?}", session.messages);

        let reply_content = match self.reply_text(&session) {
            Ok(reply_content) => reply_content,
            Err(err) => {
                tracing::error!("[FENGLI] reply error={}", err);
                return Reply::error(APOLOGY);
            }
        };
        tracing::debug!(
            "[FENGLI] session_id={}, reply_cont={}, completion_tokens={}",
            session_id,
            reply_content.content,
            reply_content.completion_tokens
        );

        self.sessions
            .session_reply(&reply_content.content, session_id, reply_content.total_tokens);
        Reply::text(&reply_content.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::bridge::ReplyType;
    use crate::session::Message;

    fn unreachable_bot() -> FengliBot {
        FengliBot::new(
            InMemorySessions::default(),
            FengliClient::new("http://127.0.0.1:1/chat", 1, "wudongfeng").unwrap(),
            RetryPolicy::new(2, Duration::from_millis(1)),
        )
    }

    #[test]
    fn test_unsupported_type_message() {
        assert_eq!(
            unsupported_type_message(ContextType::Image),
            "Bot不支持处理IMAGE类型的消息"
        );
    }

    #[test]
    fn test_non_text_context_does_not_touch_session() {
        let bot = unreachable_bot();
        let reply = bot.reply("hello", &Context::new(ContextType::Voice, "s1"));

        assert_eq!(reply.kind, ReplyType::Error);
        assert_eq!(reply.content, "Bot不支持处理VOICE类型的消息");
        assert!(bot.sessions().is_empty());
    }

    #[test]
    fn test_failure_returns_apology_and_skips_session_reply() {
        let bot = unreachable_bot();
        let reply = bot.reply("hello", &Context::text("s1"));

        assert_eq!(reply, Reply::error(APOLOGY));
        let session = bot.sessions().get("s1").unwrap();
        assert_eq!(session.messages, vec![Message::user("hello")]);
    }

    #[test]
    fn test_failed_turns_stay_within_history_cap() {
        let bot = FengliBot::new(
            InMemorySessions::new("fengli", "", 2),
            FengliClient::new("http://127.0.0.1:1/chat", 1, "wudongfeng").unwrap(),
            RetryPolicy::new(0, Duration::from_millis(1)),
        );
        let context = Context::text("s1");
        for i in 0..6 {
            let reply = bot.reply(&format!("q{i}"), &context);
            assert!(reply.is_error());
        }

        let session = bot.sessions().get("s1").unwrap();
        assert_eq!(
            session.messages,
            vec![Message::user("q4"), Message::user("q5")]
        );
    }

    #[test]
    fn test_reply_text_reports_attempts() {
        let bot = unreachable_bot();
        let session = Session::new("s1", "fengli", "");

        let err = bot.reply_text(&session).unwrap_err();

        assert_eq!(err.attempts, 3);
        assert!(matches!(err.last, FengliError::InvalidTranscript(_)));
    }
}
