//! Video generation.
//!
//! The initiating call returns a long-running operation handle instead of a
//! result. The handle is tied to the API key that created it, so the whole
//! start-and-poll sequence runs inside one executor attempt with one key: a
//! quota failure anywhere in the sequence rotates to the next key and starts
//! the operation over from the beginning.

use async_trait::async_trait;
use serde_json::Value;

use super::StudioClient;
use crate::error::GatewayError;
use crate::gemini::{self, VideoInstance, VideoParameters, VideoRequest};
use crate::polling::{Operation, poll_until_done, progress};
use crate::traits::{ProgressSink, VideoCapability};
use crate::types::MediaInput;

const VIDEO_FAILED: &str = "Video generation failed. Please try again.";
const NO_LINKS: &str = "Video generation completed, but no download links were found.";

/// Download links are served from a mirror path that rejects plain key auth;
/// point them back at the public API surface.
fn rewrite_download_link(uri: &str) -> String {
    uri.replace("/v1main/", "/v1beta/")
}

fn extract_download_links(operation: &Operation) -> Result<Vec<String>, GatewayError> {
    if let Some(error) = operation.failure(VIDEO_FAILED) {
        return Err(error);
    }

    // The result payload has shipped under two names for the sample list and
    // two names for the link itself.
    let samples = operation
        .response
        .as_ref()
        .and_then(|response| {
            response
                .pointer("/generateVideoResponse/generatedSamples")
                .or_else(|| response.pointer("/generateVideoResponse/generatedVideos"))
        })
        .and_then(Value::as_array);

    let links: Vec<String> = samples
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .pointer("/video/uri")
                        .or_else(|| entry.pointer("/videoUri"))
                        .and_then(Value::as_str)
                        .map(rewrite_download_link)
                })
                .collect()
        })
        .unwrap_or_default();

    if links.is_empty() {
        return Err(GatewayError::ContentRejected(NO_LINKS.to_string()));
    }
    Ok(links)
}

#[async_trait]
impl VideoCapability for StudioClient {
    async fn generate_videos(
        &self,
        prompt: &str,
        image: Option<&MediaInput>,
        count: u32,
        on_progress: ProgressSink<'_>,
    ) -> Result<Vec<String>, GatewayError> {
        let start_url =
            gemini::predict_long_running_url(&self.config.base_url, &self.config.video_model);
        let request = VideoRequest {
            instances: vec![VideoInstance {
                prompt: prompt.to_string(),
                image: image.map(MediaInput::to_veo_image),
            }],
            parameters: VideoParameters {
                sample_count: count,
            },
        };

        self.executor
            .execute(|key| {
                let start_url = start_url.as_str();
                let request = &request;
                async move {
                    on_progress(progress::STARTING);
                    let operation: Operation = self
                        .post_json(&key, start_url, request, VIDEO_FAILED)
                        .await?;
                    on_progress(progress::SUBMITTED);
                    tracing::info!(name = %operation.name, "video operation started");

                    let refresh = |name: String| {
                        let key = key.clone();
                        async move {
                            let url = gemini::operation_url(&self.config.base_url, &name);
                            self.get_json::<Operation>(&key, &url, VIDEO_FAILED).await
                        }
                    };
                    let done = poll_until_done(
                        operation,
                        self.config.poll_interval,
                        refresh,
                        on_progress,
                    )
                    .await?;

                    on_progress(progress::DONE);
                    extract_download_links(&done)
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::polling::OperationStatus;
    use serde_json::json;

    fn done_operation(response: Value) -> Operation {
        Operation {
            name: "operations/op".to_string(),
            done: true,
            response: Some(response),
            error: None,
        }
    }

    #[test]
    fn links_are_extracted_and_rewritten() {
        let operation = done_operation(json!({
            "generateVideoResponse": {
                "generatedSamples": [
                    {"video": {"uri": "https://host/v1main/files/a:download?alt=media"}},
                    {"video": {"uri": "https://host/v1beta/files/b:download?alt=media"}}
                ]
            }
        }));
        let links = extract_download_links(&operation).unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].contains("/v1beta/files/a"));
        assert!(links[1].contains("/v1beta/files/b"));
    }

    #[test]
    fn legacy_sample_list_name_is_accepted() {
        let operation = done_operation(json!({
            "generateVideoResponse": {
                "generatedVideos": [
                    {"video": {"uri": "https://host/v1beta/files/c"}}
                ]
            }
        }));
        let links = extract_download_links(&operation).unwrap();
        assert_eq!(links, vec!["https://host/v1beta/files/c".to_string()]);
    }

    #[test]
    fn empty_sample_list_is_a_rejection() {
        let operation = done_operation(json!({
            "generateVideoResponse": {"generatedSamples": []}
        }));
        let err = extract_download_links(&operation).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ContentRejected);
        assert_eq!(err.user_message(), NO_LINKS);
    }

    #[test]
    fn missing_response_payload_is_a_rejection() {
        let operation = Operation {
            name: "operations/op".to_string(),
            done: true,
            response: None,
            error: None,
        };
        let err = extract_download_links(&operation).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ContentRejected);
    }

    #[test]
    fn terminal_operation_error_takes_precedence() {
        let operation = Operation {
            name: "operations/op".to_string(),
            done: true,
            response: None,
            error: Some(OperationStatus {
                code: Some(429),
                message: Some("quota".to_string()),
            }),
        };
        let err = extract_download_links(&operation).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Quota);
    }
}
