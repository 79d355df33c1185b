//! Default model identifiers and endpoints.

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Text utility calls (translation, prompt elaboration).
pub const TEXT_MODEL: &str = "gemini-2.5-flash";

/// Text-to-image generation.
pub const IMAGE_MODEL: &str = "imagen-4.0-generate-001";

/// Image editing and multi-image composition.
pub const IMAGE_EDIT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Video generation.
pub const VIDEO_MODEL: &str = "veo-2.0-generate-001";
