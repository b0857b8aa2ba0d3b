//! HTTP retry helpers for transient errors.
//!
//! Fetchers should use [`send_text`] or [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so every request gets
//! automatic retry with exponential backoff on timeouts, connection
//! resets, server errors, and rate limiting.

use std::time::Duration;

use crate::SourceError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (2s, 4s, 8s) the total wait before giving
/// up is 14 seconds.
const MAX_RETRIES: u32 = 3;

/// Sends an HTTP request and returns the response body as text.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// # Errors
///
/// Returns [`SourceError::Http`] once a non-transient error occurs or
/// all retry attempts are exhausted.
pub async fn send_text<F>(build_request: F) -> Result<String, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request).await?;
    Ok(response.text().await?)
}

/// Sends an HTTP request and parses the response body as JSON.
///
/// # Errors
///
/// Returns [`SourceError::Http`] for request failures and
/// [`SourceError::Json`] for undecodable bodies.
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let body = send_text(build_request).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn send_inner<F>(build_request: &F) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0u32;

    loop {
        let result = build_request().send().await;

        let retryable = match &result {
            Ok(response) => {
                let status = response.status();
                status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            Err(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        };

        if retryable && attempt < MAX_RETRIES {
            attempt += 1;
            let delay = Duration::from_secs(1 << attempt);
            log::warn!(
                "Transient HTTP failure (attempt {attempt}/{MAX_RETRIES}), retrying in {}s",
                delay.as_secs()
            );
            tokio::time::sleep(delay).await;
            continue;
        }

        return Ok(result?.error_for_status()?);
    }
}
