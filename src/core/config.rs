use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "fengli";
pub const DEFAULT_FENGLI_API: &str = "http://127.0.0.1:8800/chat";
pub const DEFAULT_BOT_ID: u64 = 1;
pub const DEFAULT_USER_ID: &str = "wudongfeng";

/// Settings for the fengli backend. Built once by the host and passed
/// into the client and bot constructors.
///
/// Deserializes from the host's flat JSON key-value file; any key the
/// file leaves out keeps its default and unknown keys are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub model: String,
    pub fengli_api: String,
    pub bot_id: u64,
    pub user_id: String,
    pub character_desc: String,
    pub max_history: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            fengli_api: DEFAULT_FENGLI_API.to_string(),
            bot_id: DEFAULT_BOT_ID,
            user_id: DEFAULT_USER_ID.to_string(),
            character_desc: String::new(),
            max_history: 20,
            max_retries: 2,
            retry_delay_secs: 3,
        }
    }
}

impl BotConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: BotConfig =
            serde_json::from_str(raw).context("Failed to parse bot config JSON")?;
        Ok(config.normalized())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw)
    }

    /// Defaults, then the optional config file, then environment
    /// variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(api) = non_empty_env("FENGLI_API") {
            self.fengli_api = api;
        }
        if let Some(model) = non_empty_env("FENGLI_MODEL") {
            self.model = model;
        }
        if let Some(user_id) = non_empty_env("FENGLI_USER_ID") {
            self.user_id = user_id;
        }
        if let Some(desc) = non_empty_env("FENGLI_CHARACTER_DESC") {
            self.character_desc = desc;
        }
        self.normalized()
    }

    /// Apply the `--api` flag, which beats every other source.
    pub fn with_api_override(mut self, api: Option<String>) -> Self {
        if let Some(api) = api.filter(|v| !v.trim().is_empty()) {
            self.fengli_api = api;
        }
        self
    }

    // An empty model or endpoint in the file means "use the default"
    fn normalized(mut self) -> Self {
        if self.model.trim().is_empty() {
            self.model = DEFAULT_MODEL.to_string();
        }
        if self.fengli_api.trim().is_empty() {
            self.fengli_api = DEFAULT_FENGLI_API.to_string();
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
