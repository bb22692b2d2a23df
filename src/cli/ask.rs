use anyhow::Result;

use crate::bot::Bot;
use crate::bridge::{Context, Reply};
use crate::core::BotConfig;
use crate::fengli::FengliBot;

pub fn run(config: &BotConfig, query: &str, session_id: &str) -> Result<()> {
    let bot = FengliBot::from_config(config)?;
    let reply = bot.reply(query, &Context::text(session_id));
    tracing::debug!("{}", reply);
    println!("{}", render(&reply));
    Ok(())
}

pub fn render(reply: &Reply) -> String {
    if reply.is_error() {
        format!("Error: {}", reply.content)
    } else {
        reply.content.clone()
    }
}
