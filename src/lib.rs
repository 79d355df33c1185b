//! # longan
//!
//! Key-rotating Google Gemini client for AI image and video generation.
//!
//! The crate is the API-access layer of a creative studio application. Its
//! center of gravity is the gateway that manages a pool of user-supplied API
//! keys, rotates between them when one runs out of quota, normalizes the
//! service's inconsistently shaped error payloads into a closed set of
//! user-facing errors, and polls long-running video operations to
//! completion.
//!
//! # Architecture
//! - [`keys`] - ordered API key pool with a rotation cursor, shared by handle
//! - [`error`] - the closed error taxonomy and the failure classifier
//! - [`rotation`] - the retry-and-rotate executor wrapped around every call
//! - [`polling`] - fixed-interval polling of long-running operations
//! - [`client`] - the operation facade ([`StudioClient`]) and its builder
//! - [`gemini`] - wire-format request and response models
//! - [`traits`] - capability traits the UI layer consumes
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
//!     let prompt = client.elaborate_prompt("a rainy neon street").await?;
//!     let images = client.generate_images(&prompt, 2, "9:16").await?;
//!     println!("generated {} images", images.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod gemini;
pub mod keys;
pub mod models;
pub mod polling;
pub mod rotation;
pub mod traits;
pub mod types;
mod utils;

pub use client::{StudioClient, StudioClientBuilder, StudioConfig};
pub use error::{ErrorCategory, GatewayError};
pub use keys::KeyPool;
pub use traits::{ImageCapability, ProgressSink, TextCapability, VideoCapability};
pub use types::{GeneratedImage, MediaInput};

/// Commonly used imports.
pub mod prelude {
    pub use crate::client::{StudioClient, StudioClientBuilder, StudioConfig};
    pub use crate::error::{ErrorCategory, GatewayError};
    pub use crate::keys::KeyPool;
    pub use crate::traits::{
        ImageCapability, ProgressSink, TextCapability, VideoCapability,
    };
    pub use crate::types::{GeneratedImage, MediaInput};
}
