use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod ask;
pub mod chat;

use crate::core::{BotConfig, logging};

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {
        #[arg(long, default_value = "cli")]
        session_id: String,
    },
    /// Send a single message and print the reply
    Ask {
        #[arg(long)]
        query: String,
        #[arg(long, default_value = "cli")]
        session_id: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the fengli chat endpoint
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

pub fn run() -> Result<()> {
    let args = Cli::parse();
    logging::init();

    let config = BotConfig::load(args.config.as_deref())?.with_api_override(args.api);
    tracing::debug!("Loaded config: {:?}", config);

    match args.command {
        Some(Command::Chat { session_id }) => {
            chat::run(&config, &session_id)?;
        }
        Some(Command::Ask { query, session_id }) => {
            ask::run(&config, &query, &session_id)?;
        }
        None => {}
    }

    Ok(())
}
