//! Value types exchanged between the host and a bot backend.

pub mod context;
pub mod reply;

pub use context::{Context, ContextType};
pub use reply::{Reply, ReplyType};
