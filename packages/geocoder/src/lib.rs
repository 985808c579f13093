#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address geocoding for property resolution.
//!
//! Converts a free-text address into coordinates plus typed
//! administrative components using one configured provider:
//!
//! 1. **Google Geocoding API** (priority 1), requires
//!    `GOOGLE_MAPS_API_KEY`.
//! 2. **Nominatim / OpenStreetMap** (priority 2), keyless.
//!
//! The provider is chosen once at start-up by [`provider_from_registry`]
//! and injected into a [`GeocodeResolver`]. Resolution makes a single
//! attempt; there is no cross-provider retry.

pub mod google;
pub mod nominatim;

use std::sync::Arc;

use async_trait::async_trait;
use property_intel_geocoder_models::{GeocodeResult, GeocoderId};
use property_intel_provider::ProviderError;
use property_intel_provider::registry::{self, ProviderConfig, ServiceKind};
use thiserror::Error;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The address was empty after trimming.
    #[error("Address is empty")]
    EmptyAddress,

    /// The provider found nothing for the address.
    #[error("No geocoding result for '{address}'")]
    NoResult {
        /// The address that was looked up.
        address: String,
    },

    /// The provider answered but the location could not be used.
    #[error("Malformed geocoding response: {message}")]
    Malformed {
        /// Description of the problem.
        message: String,
    },

    /// The provider reported an error status (e.g. `REQUEST_DENIED`).
    #[error("Geocoder returned status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        /// Provider status string.
        status: String,
        /// Provider error message, if any.
        message: Option<String>,
    },

    /// Transport-level failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No enabled geocoding service has credentials configured.
    #[error("No geocoding provider is available")]
    NoProviderAvailable,
}

impl GeocodeError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// A geocoding backend.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Which provider this is.
    fn id(&self) -> GeocoderId;

    /// Resolves an address to its best-ranked result.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails, nothing matches, or
    /// the response cannot be parsed.
    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError>;
}

/// Resolves raw addresses through an injected provider.
#[derive(Clone)]
pub struct GeocodeResolver {
    provider: Arc<dyn GeocodingProvider>,
}

impl GeocodeResolver {
    /// Creates a resolver around a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn GeocodingProvider>) -> Self {
        Self { provider }
    }

    /// Which provider backs this resolver.
    #[must_use]
    pub fn provider_id(&self) -> GeocoderId {
        self.provider.id()
    }

    /// Resolves an address with a single provider call.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::EmptyAddress`] without calling the
    /// provider for blank input, [`GeocodeError::Malformed`] if the
    /// returned coordinates are not a valid WGS84 position, and any
    /// provider error unchanged.
    pub async fn resolve(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        let provider = self.provider.id();
        log::debug!("Geocoding '{address}' via {provider}");

        let result = self.provider.geocode(address).await.inspect_err(|e| {
            log::warn!("Geocoding '{address}' via {provider} failed: {e}");
        })?;

        validate_coordinates(result.latitude, result.longitude)?;

        log::info!(
            "Geocoded '{address}' -> '{}' ({:.5}, {:.5}, {})",
            result.formatted_address,
            result.latitude,
            result.longitude,
            result.precision,
        );

        Ok(result)
    }
}

/// Rejects non-finite or out-of-range coordinates.
fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), GeocodeError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(GeocodeError::malformed(format!(
            "latitude {latitude} out of range"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(GeocodeError::malformed(format!(
            "longitude {longitude} out of range"
        )));
    }
    Ok(())
}

/// Picks the first enabled geocoding service whose credentials are
/// present and builds its client.
///
/// # Errors
///
/// Returns [`GeocodeError::NoProviderAvailable`] if no service qualifies.
pub fn provider_from_registry(
    client: &reqwest::Client,
) -> Result<Arc<dyn GeocodingProvider>, GeocodeError> {
    for service in registry::enabled_of_kind(ServiceKind::Geocoding) {
        if !service.has_credentials() {
            log::info!(
                "Skipping geocoder '{}': {} not set",
                service.id,
                service.key_env().unwrap_or_default()
            );
            continue;
        }

        let provider: Arc<dyn GeocodingProvider> = match &service.provider {
            ProviderConfig::Google { base_url, .. } => {
                let api_key = service.require_api_key()?.unwrap_or_default();
                Arc::new(google::GoogleGeocoder::new(
                    client.clone(),
                    base_url.clone(),
                    api_key,
                ))
            }
            ProviderConfig::Nominatim { base_url } => Arc::new(
                nominatim::NominatimGeocoder::new(client.clone(), base_url.clone()),
            ),
            other => {
                log::warn!(
                    "Service '{}' is registered as a geocoder but has provider {other:?}",
                    service.id
                );
                continue;
            }
        };

        log::info!("Using geocoder '{}' ({})", service.id, service.name);
        return Ok(provider);
    }

    Err(GeocodeError::NoProviderAvailable)
}
