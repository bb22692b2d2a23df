pub mod bot;
pub mod bridge;
pub mod cli;
pub mod core;
pub mod fengli;
pub mod session;
