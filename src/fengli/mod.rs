//! Backend for the fengli chat service.
//!
//! `FengliBot::reply` drives one turn: record the query in the host's
//! session, transcode the transcript, POST the query with a fixed
//! retry policy, then record and return the answer.

pub mod bot;
pub mod client;
pub mod error;
pub mod retry;
pub mod transcode;

pub use bot::{APOLOGY, FengliBot, PLACEHOLDER_TOKENS, ReplyContent};
pub use client::{FengliClient, MISSING_ANSWER};
pub use error::{FengliError, RetryError};
pub use retry::{RetryPolicy, with_retry};
pub use transcode::{HistoryEntry, convert_messages};
