use serde_json::Value;

use crate::error::{BotError, Result};

/// Review status reported by the Practicum API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Reviewing,
    Approved,
    Rejected,
}

impl HomeworkStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "approved" => Some(HomeworkStatus::Approved),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Borrowed view over a payload that passed [`check_response`].
#[derive(Debug, Clone, Copy)]
pub struct HomeworkBatch<'a> {
    pub homeworks: &'a [Value],
    pub current_date: &'a Value,
}

impl<'a> HomeworkBatch<'a> {
    /// Raw `status` of the most recent homework, `None` for an empty batch.
    pub fn latest_status(&self) -> Result<Option<&'a str>> {
        let Some(latest) = self.homeworks.first() else {
            return Ok(None);
        };
        match latest.get("status") {
            None => Err(BotError::SchemaError("missing status")),
            Some(Value::String(status)) => Ok(Some(status.as_str())),
            Some(_) => Err(BotError::DomainError("unknown status")),
        }
    }

    pub fn current_date(&self) -> Option<i64> {
        self.current_date.as_i64()
    }
}

pub fn check_response(payload: &Value) -> Result<HomeworkBatch<'_>> {
    let map = payload
        .as_object()
        .ok_or(BotError::SchemaError("not a mapping"))?;
    let homeworks = map
        .get("homeworks")
        .ok_or(BotError::SchemaError("missing homeworks"))?;
    let current_date = map
        .get("current_date")
        .ok_or(BotError::SchemaError("missing current_date"))?;
    let homeworks = homeworks
        .as_array()
        .ok_or(BotError::SchemaError("homeworks not a list"))?;

    Ok(HomeworkBatch {
        homeworks: homeworks.as_slice(),
        current_date,
    })
}

pub fn parse_status(homework: &Value) -> Result<String> {
    let name = homework
        .get("homework_name")
        .ok_or(BotError::SchemaError("missing homework_name"))?;
    let name = match name {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let status = homework
        .get("status")
        .and_then(Value::as_str)
        .and_then(HomeworkStatus::parse)
        .ok_or(BotError::DomainError("unknown status"))?;

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}
