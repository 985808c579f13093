#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Administrative region resolution.
//!
//! Turns a [`GeocodeResult`] into an [`AdministrativeRegion`]: the state
//! is mandatory, the county is best effort. County FIPS codes come from
//! an injected [`CountyDirectory`] (the Census ACS county listing in
//! production) matched with
//! [`property_intel_geography_models::county::match_county`].

pub mod state;

use std::sync::Arc;

use async_trait::async_trait;
use property_intel_geocoder_models::{ComponentKind, GeocodeResult};
use property_intel_geography_models::county::{
    CountyListing, CountyMatch, match_county, normalize_county_name,
};
use property_intel_geography_models::{
    AdministrativeRegion, CountyStatus, RegionConfidence,
};
use property_intel_provider::ProviderError;
use thiserror::Error;

/// Errors from region resolution.
#[derive(Debug, Error)]
pub enum RegionError {
    /// None of the state sources produced a US state.
    #[error("Could not determine a US state for '{address}'")]
    NoState {
        /// Formatted address of the geocode result.
        address: String,
    },
}

/// Lists the counties of a state.
#[async_trait]
pub trait CountyDirectory: Send + Sync {
    /// Returns every county of the state with the given two-digit FIPS
    /// code.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the listing cannot be fetched or read.
    async fn list_counties(&self, state_fips: &str) -> Result<Vec<CountyListing>, ProviderError>;
}

/// Components that may name the county, in the order they are tried.
const COUNTY_CANDIDATE_KINDS: [ComponentKind; 3] = [
    ComponentKind::County,
    ComponentKind::Sublocality,
    ComponentKind::Locality,
];

/// Normalized, de-duplicated county name candidates.
#[must_use]
pub fn county_candidates(geocode: &GeocodeResult) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for kind in COUNTY_CANDIDATE_KINDS {
        if let Some(name) = geocode
            .components
            .get(kind)
            .and_then(normalize_county_name)
        {
            if !candidates.contains(&name) {
                candidates.push(name);
            }
        }
    }
    candidates
}

/// Resolves state and county for geocode results.
#[derive(Clone)]
pub struct AdministrativeRegionResolver {
    directory: Arc<dyn CountyDirectory>,
}

impl AdministrativeRegionResolver {
    #[must_use]
    pub fn new(directory: Arc<dyn CountyDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves the region of a geocode result.
    ///
    /// County problems never fail the call; they leave the county
    /// unresolved and are recorded in [`AdministrativeRegion::county_status`].
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NoState`] if no state can be determined.
    pub async fn resolve(
        &self,
        geocode: &GeocodeResult,
    ) -> Result<AdministrativeRegion, RegionError> {
        let Some(found) = state::extract_state(geocode) else {
            log::warn!(
                "No US state found for '{}'",
                geocode.formatted_address
            );
            return Err(RegionError::NoState {
                address: geocode.formatted_address.clone(),
            });
        };
        let us_state = found.state;
        log::debug!(
            "State {} ({}) from {}",
            us_state.abbr,
            us_state.fips,
            found.source
        );

        let candidates = county_candidates(geocode);
        let county = self.resolve_county(us_state.fips, &candidates).await;

        let resolved = county.status == CountyStatus::Resolved;
        let region = AdministrativeRegion {
            state_code: us_state.abbr.to_string(),
            state_fips: us_state.fips.to_string(),
            state_name: us_state.name.to_string(),
            state_source: found.source,
            confidence: RegionConfidence::assess(found.source, resolved),
            county_name: county.name,
            county_fips: county.fips,
            county_full_name: county.full_name,
            county_status: county.status,
        };

        log::info!(
            "Region for '{}': {} county={} ({})",
            geocode.formatted_address,
            region.state_code,
            region.county_geoid().as_deref().unwrap_or("unresolved"),
            region.confidence,
        );

        Ok(region)
    }

    /// Tries candidates in order. A resolved or ambiguous match ends the
    /// search; only "not found" moves on to the next candidate.
    async fn resolve_county(&self, state_fips: &str, candidates: &[String]) -> CountyOutcome {
        let Some(first) = candidates.first() else {
            log::debug!("No county candidate in geocode components");
            return CountyOutcome::unresolved(None, CountyStatus::NoCandidate);
        };

        let listing = match self.directory.list_counties(state_fips).await {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("County listing for state {state_fips} failed: {e}");
                return CountyOutcome::unresolved(
                    Some(first.clone()),
                    CountyStatus::LookupFailed {
                        reason: e.to_string(),
                    },
                );
            }
        };

        for candidate in candidates {
            match match_county(candidate, &listing) {
                CountyMatch::Resolved(county) => {
                    log::debug!("County '{candidate}' -> {}", county.full_name);
                    return CountyOutcome {
                        name: Some(candidate.clone()),
                        fips: Some(county.county_fips.clone()),
                        full_name: Some(county.full_name.clone()),
                        status: CountyStatus::Resolved,
                    };
                }
                CountyMatch::Ambiguous(matches) => {
                    let names: Vec<String> =
                        matches.iter().map(|c| c.full_name.clone()).collect();
                    log::warn!(
                        "County '{candidate}' is ambiguous in state {state_fips}: {}",
                        names.join("; ")
                    );
                    return CountyOutcome::unresolved(
                        Some(candidate.clone()),
                        CountyStatus::Ambiguous { candidates: names },
                    );
                }
                CountyMatch::NotFound => {
                    log::debug!("County '{candidate}' not in state {state_fips} listing");
                }
            }
        }

        CountyOutcome::unresolved(Some(first.clone()), CountyStatus::NotFound)
    }
}

struct CountyOutcome {
    name: Option<String>,
    fips: Option<String>,
    full_name: Option<String>,
    status: CountyStatus,
}

impl CountyOutcome {
    const fn unresolved(name: Option<String>, status: CountyStatus) -> Self {
        Self {
            name,
            fips: None,
            full_name: None,
            status,
        }
    }
}
