//! Single-attempt HTTP helpers for provider calls.
//!
//! Every provider request goes through [`send_json`]. Each call makes
//! exactly one attempt bounded by the client's timeout; a failure is
//! reported immediately so the caller can move on to its next fallback
//! tier.
//!
//! ```ignore
//! let client = http::build_client(http::timeout_from_env())?;
//! let body = http::send_json(client.get(&url).query(&params)).await?;
//! ```

use std::time::Duration;

use crate::ProviderError;

/// Per-request timeout used when `PROVIDER_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent used when `PROPERTY_INTEL_USER_AGENT` is not set.
///
/// Nominatim rejects requests without an identifying user agent.
pub const DEFAULT_USER_AGENT: &str = "property-intel/0.1 (+https://github.com/property-intel)";

/// Maximum length of the response body preview included in errors and logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Reads the per-request timeout from `PROVIDER_TIMEOUT_SECS`.
///
/// Falls back to [`DEFAULT_TIMEOUT`] when unset, unparseable, or zero.
#[must_use]
pub fn timeout_from_env() -> Duration {
    std::env::var("PROVIDER_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
}

/// Reads the user agent from `PROPERTY_INTEL_USER_AGENT`.
#[must_use]
pub fn user_agent_from_env() -> String {
    std::env::var("PROPERTY_INTEL_USER_AGENT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
}

/// Builds a `reqwest::Client` with the given per-request timeout.
///
/// # Errors
///
/// Returns [`ProviderError`] if the client cannot be built.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .user_agent(user_agent_from_env())
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(Into::into)
}

/// Sends a request once and parses the response body as JSON.
///
/// Timeouts, HTTP 429, and any other non-2xx status are mapped to
/// distinct [`ProviderError`] variants. URLs in errors and logs have
/// their query string removed so API keys never leak.
///
/// # Errors
///
/// Returns [`ProviderError`] if the request fails, the provider answers
/// with a non-success status, or the body is not valid JSON.
pub async fn send_json(
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, ProviderError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            let url = e.url().map(redacted_url).unwrap_or_default();
            log::warn!("Request to {url} timed out");
            return Err(ProviderError::Timeout { url });
        }
        Err(e) => return Err(ProviderError::Http(e.without_url())),
    };

    let url = redacted_url(response.url());
    let status = response.status();
    log::debug!("{url} -> HTTP {status}");

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited { url });
    }

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) if e.is_timeout() => return Err(ProviderError::Timeout { url }),
        Err(e) => return Err(ProviderError::Http(e.without_url())),
    };

    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
            url,
            preview: preview(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        log::debug!("JSON parse failed for {url}: {e}; body preview: {}", preview(&text));
        ProviderError::malformed(format!("invalid JSON from {url}: {e}"))
    })
}

/// Returns the URL without its query string or fragment.
#[must_use]
pub fn redacted_url(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Truncates a response body for inclusion in logs and errors.
fn preview(text: &str) -> String {
    if text.len() <= BODY_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_query_string() {
        let url = reqwest::Url::parse(
            "https://maps.googleapis.com/maps/api/geocode/json?address=x&key=secret",
        )
        .unwrap();
        let redacted = redacted_url(&url);
        assert_eq!(redacted, "https://maps.googleapis.com/maps/api/geocode/json");
        assert!(!redacted.contains("secret"));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(BODY_PREVIEW_LEN);
        let short = preview(&body);
        assert!(short.ends_with("..."));
        assert!(short.len() <= BODY_PREVIEW_LEN + 3);
        assert_eq!(preview("ok"), "ok");
    }

    #[test]
    fn builds_client_with_default_timeout() {
        assert!(build_client(DEFAULT_TIMEOUT).is_ok());
    }
}
