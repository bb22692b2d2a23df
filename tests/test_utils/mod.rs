//! Test utilities for integration tests
use std::sync::Mutex;
use std::time::Duration;

use fengli::fengli::{FengliBot, FengliClient, RetryPolicy};
use fengli::session::{InMemorySessions, Session, SessionStore};

/// Delay used between retries in tests. Short enough to keep the suite
/// fast, long enough to measure.
pub const TEST_RETRY_DELAY: Duration = Duration::from_millis(20);

/// Creates a bot pointed at `{base_url}/chat` with the default retry
/// count and a shortened delay.
pub fn test_bot(base_url: &str) -> FengliBot {
    let client = FengliClient::new(&format!("{}/chat", base_url), 1, "wudongfeng")
        .expect("Failed to build client");
    FengliBot::new(
        InMemorySessions::new("fengli", "", 20),
        client,
        RetryPolicy::new(2, TEST_RETRY_DELAY),
    )
}

/// Session store that records every `session_reply` call.
#[derive(Default)]
pub struct RecordingSessions {
    inner: InMemorySessions,
    pub replies: Mutex<Vec<(String, String, u64)>>,
}

impl SessionStore for RecordingSessions {
    fn session_query(&self, query: &str, session_id: &str) -> Session {
        self.inner.session_query(query, session_id)
    }

    fn session_reply(&self, content: &str, session_id: &str, total_tokens: u64) {
        self.replies.lock().unwrap().push((
            content.to_string(),
            session_id.to_string(),
            total_tokens,
        ));
        self.inner.session_reply(content, session_id, total_tokens);
    }

    fn clear_session(&self, session_id: &str) {
        self.inner.clear_session(session_id);
    }

    fn clear_all_sessions(&self) {
        self.inner.clear_all_sessions();
    }
}

/// Same as `test_bot` but backed by a `RecordingSessions` store.
pub fn recording_bot(base_url: &str) -> FengliBot<RecordingSessions> {
    let client = FengliClient::new(&format!("{}/chat", base_url), 1, "wudongfeng")
        .expect("Failed to build client");
    FengliBot::new(
        RecordingSessions::default(),
        client,
        RetryPolicy::new(2, TEST_RETRY_DELAY),
    )
}
