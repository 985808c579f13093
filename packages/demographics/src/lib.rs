#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tiered demographic lookup.
//!
//! [`DemographicFetcher::fetch`] tries the county first (only when the
//! region has a resolved county FIPS), then the state. Each tier is a
//! single provider call; a provider error and a validation failure both
//! move on to the next tier. Figures from different tiers are never
//! mixed.

pub mod validate;

use std::sync::Arc;

use async_trait::async_trait;
use property_intel_demographics_models::{AcsAggregates, AcsGeography, DemographicProfile};
use property_intel_geography_models::AdministrativeRegion;
use property_intel_provider::ProviderError;
use thiserror::Error;

pub use validate::build_profile;

/// Errors from demographic lookup.
#[derive(Debug, Error)]
pub enum DemographicError {
    /// The statistics provider failed or returned an unusable payload.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider answered but a required field was invalid.
    #[error("Invalid aggregates for {geography}: {message}")]
    Validation {
        /// Geography the row described.
        geography: String,
        /// What was wrong.
        message: String,
    },
}

/// Source of aggregate statistics.
#[async_trait]
pub trait StatisticsProvider: Send + Sync {
    /// Fetches the aggregate row for one geography.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failures, missing
    /// credentials, or an unreadable response.
    async fn fetch_aggregates(
        &self,
        geography: &AcsGeography,
    ) -> Result<AcsAggregates, ProviderError>;
}

/// County-then-state demographic funnel.
#[derive(Clone)]
pub struct DemographicFetcher {
    provider: Arc<dyn StatisticsProvider>,
}

impl DemographicFetcher {
    #[must_use]
    pub fn new(provider: Arc<dyn StatisticsProvider>) -> Self {
        Self { provider }
    }

    /// Fetches and validates a single tier.
    ///
    /// # Errors
    ///
    /// Returns [`DemographicError`] if the provider fails or the row does
    /// not validate.
    pub async fn fetch_tier(
        &self,
        geography: &AcsGeography,
    ) -> Result<DemographicProfile, DemographicError> {
        log::debug!("Fetching ACS aggregates for {geography}");
        let row = self.provider.fetch_aggregates(geography).await?;
        build_profile(geography, &row)
    }

    /// Returns the finest tier that validates.
    ///
    /// # Errors
    ///
    /// Returns the state-tier error if neither tier produced a profile.
    pub async fn fetch(
        &self,
        address: &str,
        region: &AdministrativeRegion,
    ) -> Result<DemographicProfile, DemographicError> {
        if let Some(county_fips) = region.resolved_county_fips() {
            let county = AcsGeography::County {
                state_fips: region.state_fips.clone(),
                county_fips: county_fips.to_string(),
            };
            match self.fetch_tier(&county).await {
                Ok(profile) => {
                    log::info!("Demographics for '{address}' at {county}");
                    return Ok(profile);
                }
                Err(e) => {
                    log::warn!(
                        "County demographics for '{address}' failed, falling back to state: {e}"
                    );
                }
            }
        } else {
            log::debug!("No resolved county for '{address}', using state tier");
        }

        let state = AcsGeography::State {
            state_fips: region.state_fips.clone(),
        };
        self.fetch_tier(&state)
            .await
            .inspect(|_| log::info!("Demographics for '{address}' at {state}"))
            .inspect_err(|e| log::warn!("State demographics for '{address}' failed: {e}"))
    }
}
