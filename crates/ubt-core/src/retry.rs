// SPDX-License-Identifier: Apache-2.0

//! Retry logic with exponential backoff for transient Launchpad failures.

use backon::ExponentialBuilder;

use crate::error::TriageError;

/// Determines if an HTTP status code is retryable.
///
/// Retryable status codes are 429, 500, 502, 503 and 504. Launchpad answers
/// 502/503 while its app servers restart, so those are common in practice.
#[must_use]
pub fn is_retryable_http(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Determines if a triage error is transient and worth retrying.
#[must_use]
pub fn is_retryable(e: &TriageError) -> bool {
    match e {
        TriageError::Network(req_err) => {
            if req_err.is_timeout() || req_err.is_connect() {
                return true;
            }
            req_err
                .status()
                .is_some_and(|status| is_retryable_http(status.as_u16()))
        }
        TriageError::Launchpad {
            status: Some(status),
            ..
        } => is_retryable_http(*status),
        _ => false,
    }
}

/// Creates a configured exponential backoff builder for retries.
///
/// - Factor: 2
/// - Min delay: 1 second
/// - Max times: 3
/// - Jitter: enabled
#[must_use]
pub fn retry_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_factor(2.0)
        .with_min_delay(std::time::Duration::from_secs(1))
        .with_max_times(3)
        .with_jitter()
}
