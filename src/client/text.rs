//! Text utility operations: translation and prompt elaboration.

use async_trait::async_trait;

use super::StudioClient;
use crate::error::GatewayError;
use crate::gemini::{
    self, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::traits::TextCapability;
use crate::types::MediaInput;

const ELABORATE_FAILED: &str = "Creative prompt generation failed. Please try again.";
const VIDEO_PROMPT_FAILED: &str = "Analyzing the image for a video prompt failed.";

const VIDEO_PROMPT_INSTRUCTION: &str = "Analyze the provided image. Based on the visual \
content, create a detailed, dynamic prompt in English for an AI video generation model. \
The prompt should describe a short, looping video scene that brings the image to life, \
with smooth cinematic camera movements, ultra-high resolution and photorealistic quality, \
and seamless motion free of stuttering or artifacts. Focus on action and atmosphere, \
transforming the static image into a living moment. Return only the prompt itself.";

fn display_language(tag: &str) -> &str {
    match tag {
        "en" => "English",
        "vi" => "Vietnamese",
        other => other,
    }
}

impl StudioClient {
    /// Run a `generateContent` call against the text model and return the
    /// response text, trimmed.
    async fn generate_text(
        &self,
        model: &str,
        request: GenerateContentRequest,
        default_message: &str,
    ) -> Result<String, GatewayError> {
        let url = gemini::generate_content_url(&self.config.base_url, model);
        self.executor
            .execute(|key| {
                let url = url.as_str();
                let request = &request;
                async move {
                    let response: GenerateContentResponse =
                        self.post_json(&key, url, request, default_message).await?;
                    match response.text() {
                        Some(text) => Ok(text.trim().to_string()),
                        None => Err(GatewayError::ContentRejected(default_message.to_string())),
                    }
                }
            })
            .await
    }
}

#[async_trait]
impl TextCapability for StudioClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, GatewayError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let language = display_language(target_language);
        let default_message = format!("Translation to {language} failed.");
        let prompt = format!(
            "Translate the following text to {language}. Return only the translated text, \
             without any introductory phrases or quotes. Text to translate: \"{text}\""
        );
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: Some(
                GenerationConfig::default()
                    .with_temperature(0.1)
                    .without_thinking(),
            ),
        };
        self.generate_text(&self.config.text_model, request, &default_message)
            .await
    }

    async fn elaborate_prompt(&self, base_prompt: &str) -> Result<String, GatewayError> {
        let prompt = format!(
            "Based on the following idea, generate a detailed, creative, and descriptive \
             prompt for an AI image generator. The prompt should be in English to maximize \
             compatibility with generation models. Idea: \"{base_prompt}\""
        );
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: Some(
                GenerationConfig::default()
                    .with_temperature(0.8)
                    .without_thinking(),
            ),
        };
        self.generate_text(&self.config.text_model, request, ELABORATE_FAILED)
            .await
    }

    async fn video_prompt_from_image(
        &self,
        image: &MediaInput,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![
                Part::inline_data(image.to_blob()),
                Part::text(VIDEO_PROMPT_INSTRUCTION),
            ])],
            generation_config: Some(
                GenerationConfig::default()
                    .with_temperature(0.7)
                    .with_response_modalities(&["TEXT"]),
            ),
        };
        self.generate_text(&self.config.image_edit_model, request, VIDEO_PROMPT_FAILED)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_map_to_display_names() {
        assert_eq!(display_language("en"), "English");
        assert_eq!(display_language("vi"), "Vietnamese");
        assert_eq!(display_language("ja"), "ja");
    }
}
