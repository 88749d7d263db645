use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::{BotError, Result};

/// Anything that can answer "what happened to my homework since `from_date`".
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.practicum_endpoint.clone(),
            token: config.practicum_token.clone(),
        })
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        tracing::debug!(from_date, "Requesting homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, endpoint = %self.endpoint, "Practicum request failed");
                BotError::EndpointUnavailable(self.endpoint.clone())
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(BotError::UnexpectedStatus(status.as_u16()));
        }

        let body = resp.text().await.map_err(|err| {
            tracing::warn!(error = %err, "Practicum response read failed");
            BotError::EndpointUnavailable(self.endpoint.clone())
        })?;

        let payload = serde_json::from_str(&body).map_err(|_| BotError::InvalidPayload)?;
        tracing::debug!("Homework statuses received");
        Ok(payload)
    }
}
