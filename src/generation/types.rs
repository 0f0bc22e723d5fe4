//! Wire types for the generation endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;

/// Generated (markup, stylesheet) pair. Both default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResult {
    /// HTML fragment.
    pub markup: String,
    /// CSS rules.
    pub stylesheet: String,
}

impl GenerationResult {
    /// Returns `true` when both fields are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markup.is_empty() && self.stylesheet.is_empty()
    }
}

/// Request body: `{ "prompt": … }`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    /// Prompt as typed by the user.
    pub prompt: &'a str,
}

/// Status and body of one generation exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Convenience constructor.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Outer response object. `result` holds a JSON document encoded as a string.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Inner document decoded from `result`.
#[derive(Debug, Deserialize)]
struct GeneratedCode {
    html: String,
    css: String,
}

/// Interpret a non-401 response body.
///
/// An `error` member wins over `result`. `result` must be a string whose
/// contents decode to `{"html": string, "css": string}`.
pub fn interpret_body(body: &str) -> Result<GenerationResult, GenerationError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResult(format!("response is not a JSON object: {e}")))?;

    match envelope.error {
        Some(Value::Null) | None => {}
        Some(Value::String(message)) => return Err(GenerationError::ServiceError(message)),
        Some(other) => return Err(GenerationError::ServiceError(other.to_string())),
    }

    let encoded = match envelope.result {
        Some(Value::String(encoded)) => encoded,
        Some(other) => {
            return Err(GenerationError::MalformedResult(format!(
                "`result` is not a string: {other}"
            )));
        }
        None => {
            return Err(GenerationError::MalformedResult(
                "response has neither `result` nor `error`".to_string(),
            ));
        }
    };

    let code: GeneratedCode = serde_json::from_str(&encoded)
        .map_err(|e| GenerationError::MalformedResult(format!("`result` does not decode: {e}")))?;

    Ok(GenerationResult {
        markup: code.html,
        stylesheet: code.css,
    })
}
