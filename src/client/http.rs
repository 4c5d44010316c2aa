//! Shared HTTP helpers: client construction, auth headers, status mapping.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};

use crate::error::{DirectLineError, Result};

/// Build a reqwest client with the given per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()?)
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(mut val) = HeaderValue::from_str(&format!("Bearer {token}")) {
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str, retry_after_ms: Option<u64>) -> DirectLineError {
    let message = if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    };
    match status {
        401 | 403 => DirectLineError::Authentication(message),
        429 => DirectLineError::RateLimited { retry_after_ms },
        _ => DirectLineError::api(status, message),
    }
}

/// Pass successful responses through; turn anything else into an error.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after_ms = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000));
    let body = response.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &body, retry_after_ms))
}
