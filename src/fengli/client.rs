use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use super::error::FengliError;
use crate::core::BotConfig;

/// Answer used when the service replies with JSON that has no
/// `message` field.
pub const MISSING_ANSWER: &str = "[fengli-answer]请求失败";

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub bot_id: u64,
    pub user_id: &'a str,
    pub message: &'a str,
}

/// Blocking client for the fengli chat endpoint. One `send` is exactly
/// one HTTP request.
#[derive(Clone, Debug)]
pub struct FengliClient {
    http: Client,
    endpoint: String,
    bot_id: u64,
    user_id: String,
}

impl FengliClient {
    pub fn new(endpoint: &str, bot_id: u64, user_id: &str) -> Result<Self, FengliError> {
        Ok(Self {
            http: Client::builder().build()?,
            endpoint: endpoint.to_string(),
            bot_id,
            user_id: user_id.to_string(),
        })
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, FengliError> {
        Self::new(&config.fengli_api, config.bot_id, &config.user_id)
    }

    pub fn send(&self, query: &str) -> Result<String, FengliError> {
        let body = ChatRequest {
            bot_id: self.bot_id,
            user_id: &self.user_id,
            message: query,
        };
        tracing::debug!("[FENGLI] POST {} body={:?}", self.endpoint, body);

        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(FengliError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_answer(&text)
    }
}

/// Pull the `message` string out of a response body.
pub fn parse_answer(raw: &str) -> Result<String, FengliError> {
    let data: Value = serde_json::from_str(raw)
        .map_err(|e| FengliError::Response(format!("invalid JSON: {e}")))?;
    let Some(fields) = data.as_object() else {
        return Err(FengliError::Response(format!(
            "expected a JSON object, got {data}"
        )));
    };

    match fields.get("message") {
        Some(Value::String(message)) => {
            tracing::info!("[FENGLI] Response message: {}", message);
            Ok(message.clone())
        }
        None => {
            tracing::warn!("[FENGLI] Response has no `message` field: {}", raw);
            Ok(MISSING_ANSWER.to_string())
        }
        Some(other) => Err(FengliError::Response(format!(
            "`message` is not a string: {other}"
        ))),
    }
}
