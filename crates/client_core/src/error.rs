use shared::{domain::FieldId, error::ApiException, protocol::ActionParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeypadError {
    #[error("no field bound as '{0}'")]
    UnknownField(FieldId),
    #[error(transparent)]
    Action(#[from] ActionParseError),
}

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("invalid counting server url '{0}'")]
    InvalidUrl(String),
    #[error("counting server request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("counting server rejected request: {0}")]
    Server(#[from] ApiException),
    #[error("malformed counting server response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file io failed for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("state file is not valid json: {0}")]
    Format(#[from] serde_json::Error),
}
