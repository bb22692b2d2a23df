use crate::bridge::{Context, Reply};

/// A pluggable chat backend. The host picks one implementation and
/// routes every inbound message through `reply`.
///
/// Implementations never fail outward: problems are turned into a
/// `Reply` with `ReplyType::Error`.
pub trait Bot {
    fn reply(&self, query: &str, context: &Context) -> Reply;
}
