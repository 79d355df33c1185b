//! Media value types exchanged with the caller.

use base64::Engine;
use bytes::Bytes;

use crate::gemini::{Blob, VeoImage};
use crate::utils::mime::guess_mime_from_bytes;

/// An image supplied by the user (upload, drag-and-drop, paste).
///
/// Immutable once constructed. The payload is reference-counted, so one
/// input can feed several concurrent generation calls without copying.
#[derive(Debug, Clone)]
pub struct MediaInput {
    pub file_name: String,
    pub data: Bytes,
    pub mime_type: String,
}

impl MediaInput {
    pub fn new(
        file_name: impl Into<String>,
        data: impl Into<Bytes>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Build an input from raw bytes, sniffing the MIME type from magic
    /// numbers and falling back to `image/png`.
    pub fn from_bytes(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let mime_type =
            guess_mime_from_bytes(&data).unwrap_or_else(|| "image/png".to_string());
        Self {
            file_name: file_name.into(),
            data,
            mime_type,
        }
    }

    /// Inline-data blob for a `generateContent` request part.
    pub(crate) fn to_blob(&self) -> Blob {
        Blob {
            mime_type: self.mime_type.clone(),
            data: base64::engine::general_purpose::STANDARD.encode(&self.data),
        }
    }

    /// Seed-image payload for a video generation request.
    pub(crate) fn to_veo_image(&self) -> VeoImage {
        VeoImage {
            image_bytes: base64::engine::general_purpose::STANDARD.encode(&self.data),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// A generated image returned by the service, decoded to raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
}
