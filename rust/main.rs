mod config;
mod error;
mod logger;
mod models;
mod poller;
mod practicum;
mod telegram;

use std::future::Future;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::Config;
use crate::error::BotError;
use crate::poller::Poller;
use crate::practicum::PracticumClient;
use crate::telegram::TelegramBot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    run(Config::from_env, shutdown_signal()).await
}

/// Checks configuration, builds the clients and polls until `shutdown`.
/// Nothing touches the network until the configuration is complete.
async fn run<L, S>(load_config: L, shutdown: S) -> Result<()>
where
    L: FnOnce() -> Result<Config, BotError>,
    S: Future<Output = ()>,
{
    tracing::debug!("Checking required environment variables");
    let config = load_config()
        .inspect_err(|err| {
            if err.is_fatal() {
                tracing::error!(error = %err, "Configuration check failed, stopping");
            }
        })
        .context("Configuration check failed")?;

    tracing::info!(
        endpoint = %config.practicum_endpoint,
        chat_id = %config.telegram_chat_id,
        "Starting homework status bot"
    );

    let practicum =
        PracticumClient::new(&config).context("Failed to build Practicum HTTP client")?;
    let bot = TelegramBot::new(&config).context("Failed to build Telegram HTTP client")?;

    let start = Utc::now().timestamp();
    Poller::new(practicum, bot, &config, start)
        .run(shutdown)
        .await;

    tracing::info!("Bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
