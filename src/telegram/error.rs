//! Error taxonomy for Bot API calls.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unsupported media input: {0}")]
    UnsupportedMediaInput(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Failed to open media file: {0}")]
    Io(#[from] std::io::Error),

    /// Failure envelope returned by the remote API.
    ///
    /// Only produced by [`check_envelope`]; dispatch itself hands the
    /// envelope back untouched.
    #[error("Bot API error{}: {description}", .error_code.map(|c| format!(" {c}")).unwrap_or_default())]
    Api {
        error_code: Option<i64>,
        description: String,
    },
}

/// Interprets the `{ "ok": .., "result": .. }` envelope of a response.
///
/// Returns the `result` payload on success and [`TelegramError::Api`] when
/// `ok` is false or missing.
pub fn check_envelope(response: &Value) -> Result<&Value, TelegramError> {
    if response.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(response.get("result").unwrap_or(&Value::Null));
    }

    Err(TelegramError::Api {
        error_code: response.get("error_code").and_then(Value::as_i64),
        description: response
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("no description")
            .to_owned(),
    })
}
