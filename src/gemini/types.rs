//! Typed request and response bodies.

use serde::{Deserialize, Serialize};

/// Inline binary payload, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Blob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// One piece of multimodal content. Responses mix text parts and inline-data
/// parts, so both fields are optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "inlineData")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn inline_data(blob: Blob) -> Self {
        Self {
            inline_data: Some(blob),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// User-role content wrapping the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

/// Configuration for thinking behavior. A budget of zero disables thinking,
/// which keeps short utility calls fast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThinkingConfig {
    #[serde(rename = "thinkingBudget")]
    pub thinking_budget: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "thinkingConfig")]
    pub thinking_config: Option<ThinkingConfig>,
    /// Output modalities, e.g. `["TEXT"]` or `["IMAGE", "TEXT"]`.
    #[serde(skip_serializing_if = "Option::is_none", rename = "responseModalities")]
    pub response_modalities: Option<Vec<String>>,
}

impl GenerationConfig {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn without_thinking(mut self) -> Self {
        self.thinking_config = Some(ThinkingConfig { thinking_budget: 0 });
        self
    }

    pub fn with_response_modalities(mut self, modalities: &[&str]) -> Self {
        self.response_modalities = Some(modalities.iter().map(|m| m.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate, or `None` when it produced
    /// no text at all.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// First inline-data part of the first candidate, if any.
    pub fn first_inline_data(&self) -> Option<&Blob> {
        self.first_parts()
            .iter()
            .find_map(|part| part.inline_data.as_ref())
    }

    /// First text part of the first candidate, used as the refusal reason
    /// when no image comes back.
    pub fn first_text(&self) -> Option<&str> {
        self.first_parts()
            .iter()
            .find_map(|part| part.text.as_deref())
    }
}

// Imagen `:predict`.

#[derive(Debug, Clone, Serialize)]
pub struct ImagenInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagenParameters {
    #[serde(rename = "sampleCount")]
    pub sample_count: u32,
    #[serde(skip_serializing_if = "Option::is_none", rename = "aspectRatio")]
    pub aspect_ratio: Option<String>,
    #[serde(rename = "outputMimeType")]
    pub output_mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagenRequest {
    pub instances: Vec<ImagenInstance>,
    pub parameters: ImagenParameters,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ImagenPrediction {
    #[serde(default, rename = "bytesBase64Encoded")]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default, rename = "mimeType")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ImagenResponse {
    #[serde(default)]
    pub predictions: Vec<ImagenPrediction>,
}

// Veo `:predictLongRunning`.

#[derive(Debug, Clone, Serialize)]
pub struct VeoImage {
    /// Base64-encoded seed image bytes.
    #[serde(rename = "imageBytes")]
    pub image_bytes: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoInstance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<VeoImage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoParameters {
    #[serde(rename = "sampleCount")]
    pub sample_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoRequest {
    pub instances: Vec<VideoInstance>,
    pub parameters: VideoParameters,
}
