use std::future::Future;
use std::time::Duration;

use crate::config::{Config, CursorPolicy};
use crate::error::{BotError, Result};
use crate::models::{check_response, parse_status};
use crate::practicum::HomeworkSource;
use crate::telegram::Notifier;

pub const STATUS_UNCHANGED_MESSAGE: &str = "Статус домашней работы не изменился.";

fn empty_list_message(from_date: i64) -> String {
    format!("Список домашних работ за период {} времени пуст.", from_date)
}

fn failure_message(err: &BotError) -> String {
    format!("Сбой в работе программы: {}", err)
}

/// Fetch, compare, notify, sleep. Owns all state that survives between cycles.
pub struct Poller<S, N> {
    source: S,
    notifier: N,
    cursor: i64,
    cursor_policy: CursorPolicy,
    retry_period: Duration,
    last_status: String,
    last_failure: String,
}

impl<S, N> Poller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, config: &Config, start_timestamp: i64) -> Self {
        Self {
            source,
            notifier,
            cursor: start_timestamp,
            cursor_policy: config.cursor_policy,
            retry_period: config.retry_period,
            last_status: String::new(),
            last_failure: String::new(),
        }
    }

    /// Runs cycles until `shutdown` resolves. The signal is only observed
    /// between cycles, an in-flight cycle always completes.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            retry_period_secs = self.retry_period.as_secs(),
            cursor = self.cursor,
            cursor_policy = ?self.cursor_policy,
            "Homework polling started"
        );

        tokio::pin!(shutdown);
        loop {
            self.tick().await;

            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping poller");
                    break;
                }
                _ = tokio::time::sleep(self.retry_period) => {}
            }
        }
    }

    /// One cycle with error reporting; never fails.
    pub async fn tick(&mut self) {
        if let Err(err) = self.run_cycle().await {
            self.report_failure(err).await;
        }
    }

    pub async fn run_cycle(&mut self) -> Result<()> {
        let from_date = self.cursor;
        let payload = self.source.fetch(from_date).await?;
        let batch = check_response(&payload)?;

        if self.cursor_policy == CursorPolicy::Advance {
            match batch.current_date() {
                Some(next) => self.cursor = next,
                None => tracing::warn!(
                    current_date = %batch.current_date,
                    "current_date is not an integer, cursor kept"
                ),
            }
        }

        let Some(latest) = batch.latest_status()? else {
            let message = empty_list_message(from_date);
            tracing::debug!(from_date, "Homework list is empty");
            return self.notifier.send_message(&message).await;
        };

        if latest == self.last_status {
            tracing::debug!(status = latest, "Homework status did not change");
            return self.notifier.send_message(STATUS_UNCHANGED_MESSAGE).await;
        }

        tracing::info!(
            previous = %self.last_status,
            current = latest,
            count = batch.homeworks.len(),
            "Homework status changed"
        );
        self.last_status = latest.to_string();

        for homework in batch.homeworks {
            let message = parse_status(homework)?;
            self.notifier.send_message(&message).await?;
        }
        Ok(())
    }

    async fn report_failure(&mut self, err: BotError) {
        debug_assert!(!err.is_fatal(), "configuration errors must stop startup: {err}");
        let message = failure_message(&err);
        tracing::error!("{}", message);

        // the chat transport is what broke, relaying through it would fail too
        if matches!(err, BotError::NotificationFailure(_)) {
            return;
        }

        if message == self.last_failure {
            tracing::debug!("Failure already relayed, not sending again");
            return;
        }
        self.last_failure = message;

        if let Err(relay_err) = self.notifier.send_message(&self.last_failure).await {
            tracing::error!(error = %relay_err, "Failed to relay failure to chat");
        }
    }
}
