use crate::core::currency::LookupError;
use anyhow::Result;
use std::time::Duration;

const USER_AGENT: &str = concat!("xrate/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by a provider. Every request is bounded by `timeout_secs`.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Sends a GET request and returns the body of a successful response.
///
/// Transport errors, timeouts and non-success statuses all map to
/// [`LookupError::Unavailable`]. Messages never include `url`, which may carry
/// credentials.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    label: &str,
) -> Result<String, LookupError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| {
            LookupError::Unavailable(format!("request error for {label}: {}", e.without_url()))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Unavailable(format!(
            "HTTP error: {status} for {label}"
        )));
    }

    response
        .text()
        .await
        .map_err(|e| {
            LookupError::Unavailable(format!(
                "failed to read body for {label}: {}",
                e.without_url()
            ))
        })
}
