//! Error Handling Module
//!
//! Every failure that crosses the gateway boundary is normalized into the
//! closed set of categories below before a caller sees it. Each error value
//! carries a ready-to-display message, finalized at classification time, so
//! the UI layer only ever renders it and never re-interprets the category.
//!
//! The classification rules that turn raw remote failures into these values
//! live in [`classify`].

mod classify;

pub use classify::{RawFailure, classify};

/// Coarse error category used for propagation decisions.
///
/// `Quota` is the only category that triggers key rotation; everything else
/// surfaces to the caller on the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// No API keys configured.
    Config,
    /// Invalid or revoked API key.
    Auth,
    /// Usage limit exceeded on the current key.
    Quota,
    /// Every key in the pool hit its usage limit within one call.
    QuotaExhaustedAll,
    /// Remote service overloaded or down.
    Unavailable,
    /// Remote service internal error.
    Internal,
    /// The call completed but produced no usable payload.
    ContentRejected,
    /// Anything that matched no other rule.
    Unknown,
}

/// Classified gateway error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The key pool is empty; nothing can be attempted.
    #[error("{0}")]
    MissingKeys(String),

    /// The remote service rejected the key itself.
    #[error("{0}")]
    Authentication(String),

    /// The current key ran out of quota. Recovered internally by rotation
    /// unless it was the last untried key.
    #[error("{0}")]
    QuotaExceeded(String),

    /// Every key in the pool failed with a quota error during one call.
    #[error("{message}")]
    AllKeysExhausted { pool_size: usize, message: String },

    /// The remote service reported itself overloaded or unavailable.
    #[error("{0}")]
    Unavailable(String),

    /// The remote service reported an internal error.
    #[error("{0}")]
    Internal(String),

    /// The call succeeded at the transport level but returned nothing usable,
    /// typically a safety-filter refusal. Carries the refusal text if any.
    #[error("{0}")]
    ContentRejected(String),

    /// Unclassifiable failure. The message is either the raw failure text
    /// when it already reads as a user-facing message, or the operation's
    /// default message.
    #[error("{0}")]
    Unknown(String),
}

pub(crate) const MSG_MISSING_KEYS: &str =
    "Please provide an API key to use the service.";
pub(crate) const MSG_AUTH: &str =
    "Authentication error: the API key is invalid or has been revoked. Please check it and try again.";
pub(crate) const MSG_QUOTA: &str =
    "Quota error: the API usage limit has been exceeded. Please check your plan and billing details.";
pub(crate) const MSG_UNAVAILABLE: &str =
    "The AI service is currently overloaded or unavailable. Please try again in a few minutes.";
pub(crate) const MSG_INTERNAL: &str =
    "The AI service hit an internal error. Please try again later.";

impl GatewayError {
    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingKeys(_) => ErrorCategory::Config,
            Self::Authentication(_) => ErrorCategory::Auth,
            Self::QuotaExceeded(_) => ErrorCategory::Quota,
            Self::AllKeysExhausted { .. } => ErrorCategory::QuotaExhaustedAll,
            Self::Unavailable(_) => ErrorCategory::Unavailable,
            Self::Internal(_) => ErrorCategory::Internal,
            Self::ContentRejected(_) => ErrorCategory::ContentRejected,
            Self::Unknown(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether rotating to the next key may recover from this error.
    pub fn is_quota(&self) -> bool {
        self.category() == ErrorCategory::Quota
    }

    /// The ready-to-display message carried by this error.
    pub fn user_message(&self) -> &str {
        match self {
            Self::MissingKeys(msg)
            | Self::Authentication(msg)
            | Self::QuotaExceeded(msg)
            | Self::Unavailable(msg)
            | Self::Internal(msg)
            | Self::ContentRejected(msg)
            | Self::Unknown(msg) => msg,
            Self::AllKeysExhausted { message, .. } => message,
        }
    }

    pub(crate) fn missing_keys() -> Self {
        Self::MissingKeys(MSG_MISSING_KEYS.to_string())
    }

    pub(crate) fn authentication() -> Self {
        Self::Authentication(MSG_AUTH.to_string())
    }

    pub(crate) fn quota_exceeded() -> Self {
        Self::QuotaExceeded(MSG_QUOTA.to_string())
    }

    pub(crate) fn unavailable() -> Self {
        Self::Unavailable(MSG_UNAVAILABLE.to_string())
    }

    pub(crate) fn internal() -> Self {
        Self::Internal(MSG_INTERNAL.to_string())
    }

    pub(crate) fn all_keys_exhausted(pool_size: usize) -> Self {
        let message = format!(
            "All {pool_size} API keys you provided have temporarily reached their usage limit.\n\
             \n\
             How to fix:\n\
             1. Wait a moment: limits usually reset every minute, then try again.\n\
             2. Add more keys: add API keys from other accounts in the key settings."
        );
        Self::AllKeysExhausted { pool_size, message }
    }
}
