//! Long-running operation polling.
//!
//! Video generation returns an operation resource instead of a final result.
//! [`poll_until_done`] re-fetches the operation's status on a fixed interval,
//! reporting a progress message before each check, until the service marks it
//! done. Status-check failures propagate already classified; the poller adds
//! no retry or rotation of its own. Callers that want rotation wrap the whole
//! start-and-poll sequence in the [`RotatingExecutor`](crate::rotation).

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GatewayError, RawFailure, classify};

/// Progress messages reported to the caller's sink during video generation.
pub mod progress {
    pub const STARTING: &str = "Starting the video generation request...";
    pub const SUBMITTED: &str =
        "Request submitted, processing. This can take a few minutes...";
    pub const CHECKING: &str = "Checking progress...";
    pub const DONE: &str = "Video generated successfully!";
}

/// Terminal failure reported inside an operation resource.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatus {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A long-running operation resource as returned by the service.
///
/// The handle is tied to the API key that created it; polling must reuse
/// that key.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<OperationStatus>,
}

impl Operation {
    /// Map a terminal `error` field through the classifier, if present.
    pub fn failure(&self, default_message: &str) -> Option<GatewayError> {
        self.error.as_ref().map(|status| {
            let envelope = serde_json::json!({
                "error": {
                    "code": status.code,
                    "message": status.message,
                }
            });
            classify(RawFailure::Payload(envelope), default_message)
        })
    }
}

/// Poll `operation` until its done flag is set.
///
/// Each round sleeps `interval`, reports [`progress::CHECKING`] to
/// `on_progress`, then re-fetches the operation by name through `refresh`.
/// Returns the terminal operation; inspecting its result payload is the
/// caller's job.
pub async fn poll_until_done<F, Fut>(
    mut operation: Operation,
    interval: Duration,
    refresh: F,
    on_progress: &(dyn Fn(&str) + Send + Sync),
) -> Result<Operation, GatewayError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Operation, GatewayError>>,
{
    while !operation.done {
        tokio::time::sleep(interval).await;
        on_progress(progress::CHECKING);
        tracing::debug!(name = %operation.name, "polling operation status");
        operation = refresh(operation.name.clone()).await?;
    }
    Ok(operation)
}
