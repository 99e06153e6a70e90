// crates/slipway-core/src/core/retry.rs
// ============================================================================
// Module: Retry Policy
// Description: Bounded retry wrapper for transient remote failures.
// Purpose: Apply one uniform policy to uploads and metadata writes.
// Dependencies: tokio, tracing
// ============================================================================

//! ## Overview
//! The publisher's remote calls after the idempotency check (the dual-store
//! upload and the metadata insert) share one retry policy. Attempts and delay
//! are configuration; exhaustion surfaces the final cause to the caller.
//! Read-only checks are never routed through this wrapper; a failing
//! existence probe must surface immediately rather than be masked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Bounded retry parameters.
///
/// # Invariants
/// - `attempts` counts total tries, including the first; zero behaves as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the initial one.
    pub attempts: u32,
    /// Delay between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay_ms: 6_000,
        }
    }
}

impl RetryPolicy {
    /// Returns the inter-attempt delay as a [`Duration`].
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ============================================================================
// SECTION: Retry Wrapper
// ============================================================================

/// Runs an asynchronous operation under the retry policy.
///
/// # Errors
///
/// Returns the final attempt's error once the policy is exhausted.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "{label} failed; retrying");
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(attempts, error = %err, "{label} failed; retries exhausted");
                return Err(err);
            }
        }
    }
}
