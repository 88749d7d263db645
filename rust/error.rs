use thiserror::Error;

/// Display texts are relayed to the chat as-is, so they stay in Russian.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("отсутствует обязательная переменная окружения {0}")]
    ConfigurationMissing(&'static str),

    #[error("недопустимое значение переменной окружения {name}: {value:?}")]
    InvalidConfiguration { name: &'static str, value: String },

    #[error("эндпоинт {0} недоступен")]
    EndpointUnavailable(String),

    #[error("статус ответа {0}")]
    UnexpectedStatus(u16),

    #[error("невалидные данные JSON")]
    InvalidPayload,

    #[error("структура ответа API не соответствует ожиданиям ({0})")]
    SchemaError(&'static str),

    #[error("недопустимые данные домашней работы ({0})")]
    DomainError(&'static str),

    #[error("сбой в Telegram при отправке сообщения: {0}")]
    NotificationFailure(String),
}

impl BotError {
    /// Configuration problems end the process; every other kind is retried
    /// on the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BotError::ConfigurationMissing(_) | BotError::InvalidConfiguration { .. }
        )
    }
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_errors_are_fatal() {
        assert!(BotError::ConfigurationMissing("PRACTICUM_TOKEN").is_fatal());
        assert!(BotError::InvalidConfiguration {
            name: "RETRY_PERIOD",
            value: "soon".to_string(),
        }
        .is_fatal());

        for err in [
            BotError::EndpointUnavailable("http://localhost/".to_string()),
            BotError::UnexpectedStatus(500),
            BotError::InvalidPayload,
            BotError::SchemaError("missing homeworks"),
            BotError::DomainError("unknown status"),
            BotError::NotificationFailure("chat not found".to_string()),
        ] {
            assert!(!err.is_fatal(), "{err}");
        }
    }

    #[test]
    fn display_includes_details() {
        assert_eq!(
            BotError::SchemaError("missing homeworks").to_string(),
            "структура ответа API не соответствует ожиданиям (missing homeworks)"
        );
        assert_eq!(BotError::UnexpectedStatus(503).to_string(), "статус ответа 503");
        assert_eq!(
            BotError::ConfigurationMissing("TELEGRAM_TOKEN").to_string(),
            "отсутствует обязательная переменная окружения TELEGRAM_TOKEN"
        );
    }
}
