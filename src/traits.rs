//! Capability traits.
//!
//! The facade is split into narrow capability traits so the UI layer can
//! depend on exactly the operations it uses and substitute test doubles.
//! [`StudioClient`](crate::client::StudioClient) implements all of them.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::{GeneratedImage, MediaInput};

/// Progress sink for long-running operations. Messages are ready to display.
pub type ProgressSink<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Text utility operations.
#[async_trait]
pub trait TextCapability {
    /// Translate `text` into the language named by `target_language`
    /// (a short tag such as `"en"` or `"vi"`).
    ///
    /// Empty or whitespace-only input resolves to an empty string without
    /// calling the remote service.
    async fn translate(&self, text: &str, target_language: &str)
    -> Result<String, GatewayError>;

    /// Expand a rough idea into a detailed, creative image-generation prompt.
    async fn elaborate_prompt(&self, base_prompt: &str) -> Result<String, GatewayError>;

    /// Describe an image as a dynamic video-generation prompt.
    async fn video_prompt_from_image(
        &self,
        image: &MediaInput,
    ) -> Result<String, GatewayError>;
}

/// Image generation and editing operations.
#[async_trait]
pub trait ImageCapability {
    /// Generate `count` images from a text prompt.
    async fn generate_images(
        &self,
        prompt: &str,
        count: u32,
        aspect_ratio: &str,
    ) -> Result<Vec<GeneratedImage>, GatewayError>;

    /// Edit a single image according to the prompt, preserving the subject.
    async fn edit_image(
        &self,
        prompt: &str,
        image: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError>;

    /// Combine a subject photo with a product photo into one composition.
    async fn compose_subject_product(
        &self,
        prompt: &str,
        subject: &MediaInput,
        product: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError>;

    /// Blend two people from separate photos into one shared scene.
    async fn compose_people(
        &self,
        prompt: &str,
        person_a: &MediaInput,
        person_b: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError>;
}

/// Video generation.
#[async_trait]
pub trait VideoCapability {
    /// Generate `count` videos from a prompt and an optional seed image,
    /// reporting progress messages to `on_progress` while the long-running
    /// operation is polled. Returns download links.
    async fn generate_videos(
        &self,
        prompt: &str,
        image: Option<&MediaInput>,
        count: u32,
        on_progress: ProgressSink<'_>,
    ) -> Result<Vec<String>, GatewayError>;
}
