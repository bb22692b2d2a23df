use anyhow::{Context as _, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use super::ask::render;
use crate::bot::Bot;
use crate::bridge::Context;
use crate::core::BotConfig;
use crate::fengli::FengliBot;

pub fn run(config: &BotConfig, session_id: &str) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to start line editor")?;
    let bot = FengliBot::from_config(config)?;
    let context = Context::text(session_id);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);
                let reply = bot.reply(line, &context);
                tracing::debug!("{}", reply);
                println!("{}", render(&reply));
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
