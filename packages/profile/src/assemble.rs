//! Merges stage results into a [`PropertyProfile`].

use property_intel_climate_models::ClimateRiskProfile;
use property_intel_demographics::DemographicError;
use property_intel_demographics_models::{DataTier, DemographicProfile};
use property_intel_geocoder_models::GeocodeResult;
use property_intel_geography_models::AdministrativeRegion;
use property_intel_profile_models::{DegradationLevel, PropertyProfile};

/// Demographic stage result as handed to [`assemble`].
#[derive(Debug)]
pub enum DemographicOutcome {
    /// A county or state tier validated.
    Fetched(DemographicProfile),
    /// Every tier failed and national estimates were substituted.
    Estimated {
        profile: DemographicProfile,
        cause: DemographicError,
    },
    /// Every tier failed.
    Failed(DemographicError),
}

impl DemographicOutcome {
    /// Tier achieved, `None` if nothing was produced.
    #[must_use]
    pub const fn tier(&self) -> Option<DataTier> {
        match self {
            Self::Fetched(profile) | Self::Estimated { profile, .. } => Some(profile.data_tier),
            Self::Failed(_) => None,
        }
    }
}

/// Builds the final profile. Pure and infallible.
#[must_use]
pub fn assemble(
    geocode: GeocodeResult,
    region: AdministrativeRegion,
    demographics: DemographicOutcome,
    climate: ClimateRiskProfile,
) -> PropertyProfile {
    let degradation_level = DegradationLevel::assess(demographics.tier(), climate.origin);

    let (demographics, demographics_error) = match demographics {
        DemographicOutcome::Fetched(profile) => (Some(profile), None),
        DemographicOutcome::Estimated { profile, cause } => {
            (Some(profile), Some(cause.to_string()))
        }
        DemographicOutcome::Failed(e) => (None, Some(e.to_string())),
    };

    log::info!(
        "Assembled profile for '{}': degradation={degradation_level}",
        geocode.formatted_address
    );

    PropertyProfile {
        address: geocode.input_address.clone(),
        geocode,
        region,
        demographics,
        demographics_error,
        climate,
        degradation_level,
    }
}
