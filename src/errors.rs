// src/errors.rs

use thiserror::Error;

/// Errors surfaced by the chat client.
///
/// The submission flow collapses every variant into one fixed bot message, so
/// the detail here only ever reaches the log file.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("cannot request a completion for an empty history")]
    EmptyHistory,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard error: {0}")]
    Clipboard(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl From<flexi_logger::FlexiLoggerError> for ChatError {
    fn from(err: flexi_logger::FlexiLoggerError) -> Self {
        Self::Logging(err.to_string())
    }
}

impl ChatError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api_error(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    pub fn clipboard_error(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }
}
