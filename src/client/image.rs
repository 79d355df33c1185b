//! Image generation, editing and composition.

use async_trait::async_trait;
use base64::Engine;

use super::StudioClient;
use crate::error::GatewayError;
use crate::gemini::{
    self, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImagenInstance, ImagenParameters, ImagenRequest, ImagenResponse, Part,
};
use crate::traits::ImageCapability;
use crate::types::{GeneratedImage, MediaInput};

const GENERATE_FAILED: &str = "Image generation failed. Please try again.";
const NO_IMAGES: &str =
    "No images were generated. The request may have been rejected by the safety policy.";
const EDIT_FAILED: &str = "Image editing failed. Your request may have been blocked. \
Please adjust the prompt or the image.";
const COMPOSE_FAILED: &str = "Image generation failed. Your request may have been blocked. \
Please adjust the prompt or the images.";

fn editor_instruction(prompt: &str) -> String {
    format!(
        "You are an expert photo editor. Your primary instruction is to follow the user's \
         prompt precisely. A key rule is to never alter the person in the provided image \
         unless specifically asked to. The user wants to add elements around them or change \
         the background. User prompt: \"{prompt}\""
    )
}

fn subject_product_instruction(prompt: &str) -> String {
    format!(
        "Analyze the two images provided. The first contains a subject, the second a \
         product. Create a single new hyperrealistic photograph that combines them in a \
         logical, natural way: a wearable product is worn correctly, an object is held or \
         used appropriately. Render the product with complete accuracy, keep the subject's \
         features and defining characteristics identical, and match lighting, shadows, \
         perspective and scale so the result looks like one professionally shot photo. If \
         the following user prompt is not empty, use it as creative guidance for the \
         background, mood or style; otherwise pick a suitable complementary background. \
         User prompt: \"{prompt}\""
    )
}

fn people_instruction(prompt: &str) -> String {
    format!(
        "You are a world-class compositing artist. Each of the two images contains a \
         person. Create a single new hyperrealistic photograph that places both people in \
         one shared scene, posed naturally together. Both must remain identical to their \
         source photos and perfectly recognizable. Establish one consistent light source, \
         a uniform color grade, matching depth of field and coherent perspective and scale \
         so the result is indistinguishable from a real photograph. The scene, mood and \
         activity come from this user prompt: \"{prompt}\""
    )
}

fn decode_base64_image(encoded: &str, mime_type: String) -> Result<GeneratedImage, GatewayError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|err| GatewayError::Unknown(format!("failed to decode image payload: {err}")))?;
    Ok(GeneratedImage { data, mime_type })
}

fn decode_predictions(response: ImagenResponse) -> Result<Vec<GeneratedImage>, GatewayError> {
    if response.predictions.is_empty() {
        return Err(GatewayError::ContentRejected(NO_IMAGES.to_string()));
    }
    response
        .predictions
        .into_iter()
        .map(|prediction| {
            let encoded = prediction
                .bytes_base64_encoded
                .ok_or_else(|| GatewayError::ContentRejected(NO_IMAGES.to_string()))?;
            decode_base64_image(
                &encoded,
                prediction.mime_type.unwrap_or_else(|| "image/png".to_string()),
            )
        })
        .collect()
}

/// Pull the first inline image out of an editing response, or turn the
/// model's text answer into a rejection error.
fn extract_image(response: &GenerateContentResponse) -> Result<GeneratedImage, GatewayError> {
    match response.first_inline_data() {
        Some(blob) => decode_base64_image(&blob.data, blob.mime_type.clone()),
        None => {
            let refusal = response.first_text().unwrap_or(NO_IMAGES);
            Err(GatewayError::ContentRejected(format!(
                "Image generation failed: {refusal}"
            )))
        }
    }
}

impl StudioClient {
    /// Shared path for every image-producing `generateContent` call.
    async fn generate_content_image(
        &self,
        parts: Vec<Part>,
        default_message: &'static str,
    ) -> Result<GeneratedImage, GatewayError> {
        let url =
            gemini::generate_content_url(&self.config.base_url, &self.config.image_edit_model);
        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(
                GenerationConfig::default().with_response_modalities(&["IMAGE", "TEXT"]),
            ),
        };
        self.executor
            .execute(|key| {
                let url = url.as_str();
                let request = &request;
                async move {
                    let response: GenerateContentResponse =
                        self.post_json(&key, url, request, default_message).await?;
                    extract_image(&response)
                }
            })
            .await
    }
}

#[async_trait]
impl ImageCapability for StudioClient {
    async fn generate_images(
        &self,
        prompt: &str,
        count: u32,
        aspect_ratio: &str,
    ) -> Result<Vec<GeneratedImage>, GatewayError> {
        let url = gemini::predict_url(&self.config.base_url, &self.config.image_model);
        let request = ImagenRequest {
            instances: vec![ImagenInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImagenParameters {
                sample_count: count,
                aspect_ratio: (!aspect_ratio.is_empty()).then(|| aspect_ratio.to_string()),
                output_mime_type: "image/png".to_string(),
            },
        };
        self.executor
            .execute(|key| {
                let url = url.as_str();
                let request = &request;
                async move {
                    let response: ImagenResponse =
                        self.post_json(&key, url, request, GENERATE_FAILED).await?;
                    decode_predictions(response)
                }
            })
            .await
    }

    async fn edit_image(
        &self,
        prompt: &str,
        image: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError> {
        let parts = vec![
            Part::inline_data(image.to_blob()),
            Part::text(editor_instruction(prompt)),
        ];
        self.generate_content_image(parts, EDIT_FAILED).await
    }

    async fn compose_subject_product(
        &self,
        prompt: &str,
        subject: &MediaInput,
        product: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError> {
        let parts = vec![
            Part::inline_data(subject.to_blob()),
            Part::inline_data(product.to_blob()),
            Part::text(subject_product_instruction(prompt)),
        ];
        self.generate_content_image(parts, COMPOSE_FAILED).await
    }

    async fn compose_people(
        &self,
        prompt: &str,
        person_a: &MediaInput,
        person_b: &MediaInput,
    ) -> Result<GeneratedImage, GatewayError> {
        let parts = vec![
            Part::inline_data(person_a.to_blob()),
            Part::inline_data(person_b.to_blob()),
            Part::text(people_instruction(prompt)),
        ];
        self.generate_content_image(parts, COMPOSE_FAILED).await
    }
}
