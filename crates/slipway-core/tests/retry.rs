// crates/slipway-core/tests/retry.rs
// ============================================================================
// Module: Retry Policy Tests
// Description: Verifies bounded retry behavior and exhaustion reporting.
// ============================================================================
//! ## Overview
//! The retry wrapper must stop at the configured attempt count, surface the
//! final error on exhaustion, and not retry at all once an attempt succeeds.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use slipway_core::RetryPolicy;
use slipway_core::retry;

/// Policy with no inter-attempt delay, for fast tests.
const fn immediate(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        delay_ms: 0,
    }
}

#[tokio::test]
async fn succeeds_after_transient_failures() {
    let calls = AtomicU32::new(0);
    let result: Result<u32, String> = retry(immediate(5), "flaky", || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if attempt < 3 {
                return Err(format!("transient {attempt}"));
            }
            Ok(attempt)
        }
    })
    .await;
    assert_eq!(result, Ok(3));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhaustion_returns_final_error() {
    let calls = AtomicU32::new(0);
    let result: Result<(), String> = retry(immediate(3), "doomed", || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { Err(format!("failure {attempt}")) }
    })
    .await;
    assert_eq!(result, Err("failure 3".to_string()));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn immediate_success_runs_once() {
    let calls = AtomicU32::new(0);
    let result: Result<&str, String> = retry(immediate(5), "steady", || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok("done") }
    })
    .await;
    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_attempts_behaves_as_one() {
    let calls = AtomicU32::new(0);
    let result: Result<(), String> = retry(immediate(0), "minimal", || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err("nope".to_string()) }
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
