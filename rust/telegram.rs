use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{BotError, Result};

/// Chat delivery. Failures are always handed back to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    send_url: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api_url, config.telegram_token
            ),
            chat_id: config.telegram_chat_id.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send_message(&self, text: &str) -> Result<()> {
        tracing::debug!("Sending Telegram message");

        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        // without_url() keeps the bot token out of logs and chat relays
        let resp = self
            .http
            .post(&self.send_url)
            .json(&request)
            .send()
            .await
            .map_err(|err| BotError::NotificationFailure(err.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| BotError::NotificationFailure(err.without_url().to_string()))?;

        match serde_json::from_str::<BotApiResponse>(&body) {
            Ok(parsed) if status.is_success() && parsed.ok => {
                tracing::debug!("Telegram message sent");
                Ok(())
            }
            Ok(parsed) => Err(BotError::NotificationFailure(
                parsed
                    .description
                    .unwrap_or_else(|| format!("Bot API returned {}", status)),
            )),
            Err(_) => Err(BotError::NotificationFailure(format!(
                "Bot API returned {} with unreadable body",
                status
            ))),
        }
    }
}
