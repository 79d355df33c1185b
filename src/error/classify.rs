//! Failure classification.
//!
//! The remote service reports errors inconsistently: sometimes as a thrown
//! error whose message is itself a JSON-encoded error envelope, sometimes as
//! a structured body, sometimes as a bare string. [`classify`] accepts any of
//! those shapes through the [`RawFailure`] tagged union and maps it to exactly
//! one [`GatewayError`], applying the rules in a fixed order so the result is
//! deterministic for a given input.

use serde_json::Value;

use super::GatewayError;

/// Prefixes of the crate's own user-facing messages. A raw message that
/// already starts with one of these passes through verbatim instead of being
/// replaced by the operation's default message.
const KNOWN_MESSAGE_PREFIXES: &[&str] = &[
    "Authentication error",
    "Quota error",
    "The AI service",
    "Image generation",
    "Image editing",
    "Video generation",
    "Translation",
];

/// A raw failure value as produced by the remote call layer.
#[derive(Debug, Clone)]
pub enum RawFailure {
    /// A thrown error message or bare string. May itself contain a
    /// JSON-encoded error envelope.
    Text(String),
    /// A structured payload, usually `{"error": {code, status, message}}`.
    Payload(Value),
}

impl RawFailure {
    /// Build a failure value from an HTTP response.
    ///
    /// JSON bodies pass through as structured payloads. Non-JSON bodies are
    /// wrapped into a synthetic envelope carrying the HTTP status so that
    /// every response flows through the one structured mapping path.
    pub fn from_response_parts(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::Payload(value),
            Err(_) => {
                let message = body.trim();
                Self::Payload(serde_json::json!({
                    "error": {
                        "code": status,
                        "message": if message.is_empty() { Value::Null } else { Value::from(message) },
                    }
                }))
            }
        }
    }
}

/// Classify a raw failure into a [`GatewayError`].
///
/// `default_message` is the calling operation's fallback text, used when the
/// failure matches no rule and its own message does not already read as one
/// of ours.
pub fn classify(raw: RawFailure, default_message: &str) -> GatewayError {
    match raw {
        RawFailure::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => classify_payload(&value, default_message),
            Err(_) => classify_text(&text),
        },
        RawFailure::Payload(value) => classify_payload(&value, default_message),
    }
}

/// Fallback path for text that is not a JSON envelope: case-insensitive
/// substring matching against the markers the service is known to emit.
/// Text that matches nothing becomes the error message verbatim.
fn classify_text(text: &str) -> GatewayError {
    let lower = text.to_lowercase();
    if lower.contains("unauthenticated") {
        return GatewayError::authentication();
    }
    if lower.contains("resource_exhausted") || lower.contains("quota") {
        return GatewayError::quota_exceeded();
    }
    if lower.contains("unavailable") {
        return GatewayError::unavailable();
    }
    if lower.contains("internal error") {
        return GatewayError::internal();
    }
    GatewayError::Unknown(text.to_string())
}

fn classify_payload(value: &Value, default_message: &str) -> GatewayError {
    // The envelope may nest the interesting fields under "error" or carry
    // them at the top level.
    let detail = value.get("error").unwrap_or(value);
    let code = detail.get("code").and_then(Value::as_i64);
    let status = detail.get("status").and_then(Value::as_str);
    let message = detail.get("message").and_then(Value::as_str);

    match (code, status) {
        (Some(401), _) | (_, Some("UNAUTHENTICATED")) => GatewayError::authentication(),
        (Some(429), _) | (_, Some("RESOURCE_EXHAUSTED")) => GatewayError::quota_exceeded(),
        (Some(503), _) | (_, Some("UNAVAILABLE")) => GatewayError::unavailable(),
        (Some(500), _) | (_, Some("INTERNAL")) => GatewayError::internal(),
        _ => {
            let message = message.unwrap_or(default_message);
            if is_known_user_message(message) {
                GatewayError::Unknown(message.to_string())
            } else {
                GatewayError::Unknown(default_message.to_string())
            }
        }
    }
}

fn is_known_user_message(message: &str) -> bool {
    KNOWN_MESSAGE_PREFIXES
        .iter()
        .any(|prefix| message.starts_with(prefix))
}
