#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared plumbing for the upstream data providers.
//!
//! - [`http`]: client construction and a single-attempt JSON request
//!   helper with bounded timeouts. Fallback tiers, not retries, handle
//!   failures, so nothing here retries.
//! - [`registry`]: provider endpoints defined as TOML files under
//!   `services/`, embedded at compile time.

pub mod http;
pub mod registry;

use thiserror::Error;

/// Errors from talking to an upstream provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request exceeded its timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Request URL without its query string.
        url: String,
    },

    /// The provider throttled the request.
    #[error("Rate limited by {url}")]
    RateLimited {
        /// Request URL without its query string.
        url: String,
    },

    /// The provider answered with a non-success status.
    #[error("HTTP {status} from {url}: {preview}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL without its query string.
        url: String,
        /// Leading part of the response body.
        preview: String,
    },

    /// The response body could not be interpreted.
    #[error("Malformed response: {message}")]
    Malformed {
        /// Description of what was wrong.
        message: String,
    },

    /// No enabled service of the required kind is registered.
    #[error("No enabled {kind} service is configured")]
    NotConfigured {
        /// Service kind that was looked up.
        kind: String,
    },

    /// A required API key is not configured.
    #[error("Missing credentials for {service}: set {env_var}")]
    MissingCredentials {
        /// Service identifier.
        service: String,
        /// Environment variable that should hold the key.
        env_var: String,
    },
}

impl ProviderError {
    /// Convenience constructor for [`ProviderError::Malformed`].
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
