use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RunState;

/// A discrete action emitted by a keypad control or text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum FieldAction {
    Increment,
    Decrement,
    Digit(u8),
    Negate,
    Reset,
    FreeTextChanged(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("unknown field action '{0}'")]
    Unknown(String),
    #[error("digit action expects a single 0-9 digit, got '{0}'")]
    InvalidDigit(String),
}

impl FromStr for FieldAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(text) = s.strip_prefix("freeTextChanged:") {
            return Ok(FieldAction::FreeTextChanged(text.to_string()));
        }
        if let Some(raw) = s.strip_prefix("digit:") {
            let digit = match raw.trim().as_bytes() {
                [d @ b'0'..=b'9'] => d - b'0',
                _ => return Err(ActionParseError::InvalidDigit(raw.to_string())),
            };
            return Ok(FieldAction::Digit(digit));
        }
        match s.trim() {
            "increment" => Ok(FieldAction::Increment),
            "decrement" => Ok(FieldAction::Decrement),
            "negate" => Ok(FieldAction::Negate),
            "reset" => Ok(FieldAction::Reset),
            other => Err(ActionParseError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for FieldAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldAction::Increment => f.write_str("increment"),
            FieldAction::Decrement => f.write_str("decrement"),
            FieldAction::Digit(d) => write!(f, "digit:{d}"),
            FieldAction::Negate => f.write_str("negate"),
            FieldAction::Reset => f.write_str("reset"),
            FieldAction::FreeTextChanged(text) => write!(f, "freeTextChanged:{text}"),
        }
    }
}

/// Totals returned by the save and full-reset endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountSnapshot {
    pub total_count: i64,
    pub defect_count: i64,
    pub correct_count: i64,
}

/// Totals returned when only the current batch is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentCountSnapshot {
    pub current_count: i64,
    pub defect_count: i64,
    pub correct_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Started,
    Paused,
    Stopped,
}

impl From<RunStatus> for RunState {
    fn from(value: RunStatus) -> Self {
        match value {
            RunStatus::Started => RunState::Running,
            RunStatus::Paused => RunState::Paused,
            RunStatus::Stopped => RunState::Stopped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: RunStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveCountForm {
    pub correct_count: i64,
    pub defect_count: i64,
    /// JSON object of extra per-batch fields, sent as a string.
    pub custom_fields: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetCurrentForm {
    pub item_no: String,
    pub correct_count: i64,
    pub defect_count: i64,
}
