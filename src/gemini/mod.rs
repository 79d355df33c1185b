//! Gemini REST wire format.
//!
//! Request and response models for the three endpoints the gateway drives:
//! `models/{model}:generateContent` (text and image-editing calls),
//! `models/{model}:predict` (Imagen image generation) and
//! `models/{model}:predictLongRunning` (Veo video generation), plus the URL
//! builders for them. Only the fields the facade actually reads or writes
//! are modeled.

pub mod types;

pub use types::*;

/// Strip resource-style prefixes so both `gemini-2.5-flash` and
/// `models/gemini-2.5-flash` address the same model.
pub(crate) fn normalize_model_id(model: &str) -> &str {
    let trimmed = model.trim().trim_matches('/');
    match trimmed.rfind("models/") {
        Some(pos) => &trimmed[pos + "models/".len()..],
        None => trimmed,
    }
}

pub(crate) fn generate_content_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        normalize_model_id(model)
    )
}

pub(crate) fn predict_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:predict",
        base_url.trim_end_matches('/'),
        normalize_model_id(model)
    )
}

pub(crate) fn predict_long_running_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:predictLongRunning",
        base_url.trim_end_matches('/'),
        normalize_model_id(model)
    )
}

/// Operation names are service-relative (`operations/...`), but some
/// responses carry absolute URLs; pass those through untouched.
pub(crate) fn operation_url(base_url: &str, operation_name: &str) -> String {
    let name = operation_name.trim().trim_start_matches('/');
    if name.starts_with("http://") || name.starts_with("https://") {
        return name.to_string();
    }
    format!("{}/{}", base_url.trim_end_matches('/'), name)
}
