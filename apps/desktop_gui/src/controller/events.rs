//! UI/backend events and error modeling for the counting station.

use client_core::{ConnectionEvent, CounterError};
use shared::protocol::{CountSnapshot, CurrentCountSnapshot, RunStatus};

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    CountsSaved(CountSnapshot),
    CountsReset(CountSnapshot),
    CurrentCountReset(CurrentCountSnapshot),
    RunStatusChanged(RunStatus),
    Connection(ConnectionEvent),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Server,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SaveCount,
    ResetCount,
    RunControl,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_counter_error(context: UiErrorContext, err: &CounterError) -> Self {
        let category = match err {
            CounterError::Transport(_) => UiErrorCategory::Transport,
            CounterError::Server(_) => UiErrorCategory::Server,
            CounterError::InvalidUrl(_) => UiErrorCategory::Validation,
            CounterError::Decode(_) => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("invalid") || lower.contains("malformed") {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("connection")
            || lower.contains("disconnect")
            || lower.contains("unreachable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };
        Self {
            category,
            context,
            message,
        }
    }

    /// Whether the failure means the counting server could not be reached.
    pub fn is_connection_loss(&self) -> bool {
        self.category == UiErrorCategory::Transport
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use shared::error::{ApiError, ErrorCode};

    use super::*;

    #[test]
    fn server_rejection_is_not_a_connection_loss() {
        let err = CounterError::Server(
            ApiError::new(ErrorCode::Validation, "Detection config not found").into(),
        );
        let ui_err = UiError::from_counter_error(UiErrorContext::SaveCount, &err);
        assert_eq!(ui_err.category(), UiErrorCategory::Server);
        assert!(!ui_err.is_connection_loss());
        assert!(ui_err.message().contains("Detection config not found"));
    }

    #[test]
    fn disconnected_queue_message_classifies_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected; restart the station",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
    }
}
