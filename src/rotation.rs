//! Retry-and-Rotate Executor.
//!
//! Wraps every outbound call with the gateway's uniform recovery policy:
//! run the operation with the pool's current key, and when the failure is
//! quota-shaped, advance the cursor and try the next key. Any other failure
//! category aborts immediately. Once every key in the pool has been tried
//! within a single call, the call fails with a distinct exhaustion error
//! that names the pool size.
//!
//! Attempts within one call are strictly sequential: rotation has to observe
//! the outcome of attempt N before deciding whether to make attempt N+1.
//! Independent calls issued concurrently share the cursor without an outer
//! lock; under simultaneous quota failures the cursor may advance more than
//! once for the same logical exhaustion, costing at most one wasted attempt.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::keys::KeyPool;

/// Decision taken after a failed attempt.
#[derive(Debug, PartialEq, Eq)]
enum AttemptOutcome {
    /// Quota failure: advance the cursor and try the next key.
    Rotate(GatewayError),
    /// Any other category: stop and surface the error as-is.
    Abort(GatewayError),
}

fn outcome_for(error: GatewayError) -> AttemptOutcome {
    if error.is_quota() {
        AttemptOutcome::Rotate(error)
    } else {
        AttemptOutcome::Abort(error)
    }
}

/// Executes keyed operations against the shared [`KeyPool`], rotating on
/// quota failures.
#[derive(Debug, Clone)]
pub struct RotatingExecutor {
    pool: Arc<KeyPool>,
}

impl RotatingExecutor {
    pub fn new(pool: Arc<KeyPool>) -> Self {
        Self { pool }
    }

    /// Handle to the pool this executor rotates over.
    pub fn pool(&self) -> &Arc<KeyPool> {
        &self.pool
    }

    /// Run `operation` with the current key, rotating through the pool on
    /// quota failures until it succeeds, a non-quota failure aborts, or
    /// every key has been tried.
    ///
    /// The operation receives the key by value and is invoked at most once
    /// per pool position per call.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T, GatewayError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let mut attempted: HashSet<usize> = HashSet::new();

        // The pool length is re-read each round: replacing the keys during a
        // call makes the remaining attempts roll over onto the new pool.
        while attempted.len() < self.pool.len() {
            let Some((position, key)) = self.pool.current() else {
                return Err(GatewayError::missing_keys());
            };
            attempted.insert(position);

            match operation(key).await {
                Ok(value) => return Ok(value),
                Err(error) => match outcome_for(error) {
                    AttemptOutcome::Rotate(error) => {
                        tracing::warn!(
                            position,
                            tried = attempted.len(),
                            "quota failure, rotating to next API key: {error}"
                        );
                        self.pool.advance();
                    }
                    AttemptOutcome::Abort(error) => {
                        tracing::debug!(position, "non-recoverable failure: {error}");
                        return Err(error);
                    }
                },
            }
        }

        if self.pool.is_empty() {
            return Err(GatewayError::missing_keys());
        }
        Err(GatewayError::all_keys_exhausted(self.pool.len()))
    }
}
