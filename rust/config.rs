use std::env;
use std::time::Duration;

use crate::error::{BotError, Result};

pub const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How the `from_date` cursor moves between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPolicy {
    /// Keep querying from the process start time.
    #[default]
    Fixed,
    /// Move to the `current_date` reported by the last valid response.
    Advance,
}

impl CursorPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fixed" => Some(CursorPolicy::Fixed),
            "advance" => Some(CursorPolicy::Advance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub practicum_endpoint: String,
    pub telegram_api_url: String,
    pub retry_period: Duration,
    pub request_timeout: Duration,
    pub cursor_policy: CursorPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Required values are checked first, in declaration order, so the
    /// reported variable is deterministic.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let practicum_token = required(&lookup, "PRACTICUM_TOKEN")?;
        let telegram_token = required(&lookup, "TELEGRAM_TOKEN")?;
        let telegram_chat_id = required(&lookup, "TELEGRAM_CHAT_ID")?;

        let practicum_endpoint = lookup("PRACTICUM_ENDPOINT")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string());
        let telegram_api_url = lookup("TELEGRAM_API_URL")
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let retry_period = seconds(&lookup, "RETRY_PERIOD", DEFAULT_RETRY_PERIOD_SECS)?;
        let request_timeout = seconds(
            &lookup,
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let cursor_policy = match lookup("CURSOR_POLICY") {
            None => CursorPolicy::default(),
            Some(value) => {
                CursorPolicy::parse(&value).ok_or(BotError::InvalidConfiguration {
                    name: "CURSOR_POLICY",
                    value,
                })?
            }
        };

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint,
            telegram_api_url,
            retry_period,
            request_timeout,
            cursor_policy,
        })
    }
}

#[cfg(test)]
pub fn test_config(practicum_endpoint: &str, telegram_api_url: &str) -> Config {
    Config {
        practicum_token: "practicum-secret".to_string(),
        telegram_token: "123:abc".to_string(),
        telegram_chat_id: "42".to_string(),
        practicum_endpoint: practicum_endpoint.to_string(),
        telegram_api_url: telegram_api_url.trim_end_matches('/').to_string(),
        retry_period: Duration::from_millis(10),
        request_timeout: Duration::from_secs(5),
        cursor_policy: CursorPolicy::Fixed,
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .ok_or(BotError::ConfigurationMissing(name))
}

fn seconds<F>(lookup: &F, name: &'static str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(Duration::from_secs(default)),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(BotError::InvalidConfiguration { name, value }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("PRACTICUM_TOKEN", "practicum-secret"),
        ("TELEGRAM_TOKEN", "123:abc"),
        ("TELEGRAM_CHAT_ID", "42"),
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.practicum_token, "practicum-secret");
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.telegram_chat_id, "42");
        assert_eq!(config.practicum_endpoint, DEFAULT_PRACTICUM_ENDPOINT);
        assert_eq!(config.telegram_api_url, DEFAULT_TELEGRAM_API_URL);
        assert_eq!(config.retry_period, Duration::from_secs(600));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cursor_policy, CursorPolicy::Fixed);
    }

    #[test]
    fn each_missing_required_value_is_reported() {
        for (missing, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(name, _)| *name != missing)
                .collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(
                matches!(err, BotError::ConfigurationMissing(name) if name == missing),
                "expected {missing} to be reported, got {err}"
            );
        }
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[
            ("PRACTICUM_TOKEN", "   "),
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::ConfigurationMissing("PRACTICUM_TOKEN")));
    }

    #[test]
    fn optional_values_override_defaults() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PRACTICUM_ENDPOINT", "http://localhost:8080/statuses/"),
            ("TELEGRAM_API_URL", "http://localhost:9090/"),
            ("RETRY_PERIOD", "5"),
            ("REQUEST_TIMEOUT_SECS", "2"),
            ("CURSOR_POLICY", "Advance"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.practicum_endpoint, "http://localhost:8080/statuses/");
        assert_eq!(config.telegram_api_url, "http://localhost:9090");
        assert_eq!(config.retry_period, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.cursor_policy, CursorPolicy::Advance);
    }

    #[test]
    fn malformed_optional_values_are_rejected() {
        for (name, value) in [
            ("RETRY_PERIOD", "ten minutes"),
            ("RETRY_PERIOD", "0"),
            ("REQUEST_TIMEOUT_SECS", "-1"),
            ("CURSOR_POLICY", "rewind"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((name, value));
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(
                matches!(&err, BotError::InvalidConfiguration { name: n, .. } if *n == name),
                "expected {name}={value} to be rejected, got {err}"
            );
        }
    }
}
