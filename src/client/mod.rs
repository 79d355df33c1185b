//! Studio client.
//!
//! The facade over the generative endpoints. Every operation composes the
//! same pieces: build a typed request body, hand a keyed closure to the
//! [`RotatingExecutor`], issue the HTTP call with that key, classify any
//! failure, and extract the relevant payload from the response.
//!
//! # Example
//! ```rust,no_run
//! use longan::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), longan::GatewayError> {
//!     let client = StudioClient::builder()
//!         .api_keys("key-one,key-two")
//!         .build()?;
//!
//!     let images = client.generate_images("a cat in a spacesuit", 2, "1:1").await?;
//!     println!("got {} images", images.len());
//!     Ok(())
//! }
//! ```

mod image;
mod text;
mod video;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{GatewayError, RawFailure, classify};
use crate::keys::KeyPool;
use crate::models;
use crate::rotation::RotatingExecutor;

/// Configuration for a [`StudioClient`].
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// API endpoint root.
    pub base_url: String,
    /// Model for text utility calls.
    pub text_model: String,
    /// Model for text-to-image generation.
    pub image_model: String,
    /// Model for image editing and composition.
    pub image_edit_model: String,
    /// Model for video generation.
    pub video_model: String,
    /// Fixed interval between status checks on long-running operations.
    pub poll_interval: Duration,
    /// Optional per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            base_url: models::DEFAULT_BASE_URL.to_string(),
            text_model: models::TEXT_MODEL.to_string(),
            image_model: models::IMAGE_MODEL.to_string(),
            image_edit_model: models::IMAGE_EDIT_MODEL.to_string(),
            video_model: models::VIDEO_MODEL.to_string(),
            poll_interval: Duration::from_secs(10),
            timeout: None,
        }
    }
}

/// Client for the generative studio operations.
///
/// Cheap to clone is not a goal here; share it behind an `Arc` if several
/// tasks need it. The key pool itself is always shared by handle.
#[derive(Debug)]
pub struct StudioClient {
    pub(crate) config: StudioConfig,
    pub(crate) http_client: reqwest::Client,
    pub(crate) executor: RotatingExecutor,
}

impl StudioClient {
    pub fn builder() -> StudioClientBuilder {
        StudioClientBuilder::new()
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    /// Handle to the shared key pool, for replacing keys at runtime.
    pub fn key_pool(&self) -> &Arc<KeyPool> {
        self.executor.pool()
    }

    pub(crate) async fn post_json<B, T>(
        &self,
        api_key: &str,
        url: &str,
        body: &B,
        default_message: &str,
    ) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| classify(RawFailure::Text(err.to_string()), default_message))?;
        Self::read_json(response, default_message).await
    }

    pub(crate) async fn get_json<T>(
        &self,
        api_key: &str,
        url: &str,
        default_message: &str,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .get(url)
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .map_err(|err| classify(RawFailure::Text(err.to_string()), default_message))?;
        Self::read_json(response, default_message).await
    }

    async fn read_json<T>(
        response: reqwest::Response,
        default_message: &str,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| classify(RawFailure::Text(err.to_string()), default_message))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "request failed");
            return Err(classify(
                RawFailure::from_response_parts(status.as_u16(), &body),
                default_message,
            ));
        }

        serde_json::from_str(&body)
            .map_err(|err| classify(RawFailure::Text(err.to_string()), default_message))
    }
}

/// Builder for [`StudioClient`].
#[derive(Debug, Default)]
pub struct StudioClientBuilder {
    keys: Option<String>,
    pool: Option<Arc<KeyPool>>,
    config: StudioConfig,
}

impl StudioClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide API keys as a comma-separated string. Creates a pool owned by
    /// the client; use [`key_pool`](Self::key_pool) instead to share one.
    pub fn api_keys(mut self, raw: impl Into<String>) -> Self {
        self.keys = Some(raw.into());
        self
    }

    /// Use a caller-owned key pool. Takes precedence over
    /// [`api_keys`](Self::api_keys).
    pub fn key_pool(mut self, pool: Arc<KeyPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.config.text_model = model.into();
        self
    }

    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_model = model.into();
        self
    }

    pub fn image_edit_model(mut self, model: impl Into<String>) -> Self {
        self.config.image_edit_model = model.into();
        self
    }

    pub fn video_model(mut self, model: impl Into<String>) -> Self {
        self.config.video_model = model.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<StudioClient, GatewayError> {
        let pool = self
            .pool
            .unwrap_or_else(|| Arc::new(KeyPool::from_raw(self.keys.as_deref().unwrap_or(""))));

        let mut http_builder = reqwest::Client::builder();
        if let Some(timeout) = self.config.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder
            .build()
            .map_err(|err| GatewayError::Unknown(format!("failed to build HTTP client: {err}")))?;

        Ok(StudioClient {
            config: self.config,
            http_client,
            executor: RotatingExecutor::new(pool),
        })
    }
}
