#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Demographic and economic indicator types.
//!
//! [`AcsAggregates`] is the raw provider row for one geography;
//! [`DemographicProfile`] is the validated, provenance-tagged result
//! produced from it.

use property_intel_models::Tagged;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Granularity a demographic profile was sourced at, finest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataTier {
    County,
    State,
    Estimate,
}

/// A geography the statistics provider can aggregate over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum AcsGeography {
    County {
        state_fips: String,
        county_fips: String,
    },
    State {
        state_fips: String,
    },
}

impl AcsGeography {
    /// The tier a profile built from this geography belongs to.
    #[must_use]
    pub const fn tier(&self) -> DataTier {
        match self {
            Self::County { .. } => DataTier::County,
            Self::State { .. } => DataTier::State,
        }
    }

    /// GEOID of the geography (`"51153"` for a county, `"51"` for a state).
    #[must_use]
    pub fn geoid(&self) -> String {
        match self {
            Self::County {
                state_fips,
                county_fips,
            } => format!("{state_fips}{county_fips}"),
            Self::State { state_fips } => state_fips.clone(),
        }
    }
}

impl std::fmt::Display for AcsGeography {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::County {
                state_fips,
                county_fips,
            } => write!(f, "county {state_fips}{county_fips}"),
            Self::State { state_fips } => write!(f, "state {state_fips}"),
        }
    }
}

/// One row of ACS 5-year aggregates. `None` means the provider left the
/// cell empty, unparseable, or negative (ACS sentinel values).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcsAggregates {
    /// Geography name as returned by the provider, if requested.
    pub name: Option<String>,
    /// `B01003_001E` total population.
    pub population: Option<u64>,
    /// `B19013_001E` median household income, USD.
    pub median_income: Option<f64>,
    /// `B25077_001E` median home value, USD.
    pub median_home_value: Option<f64>,
    /// `B25064_001E` median gross rent, USD per month.
    pub median_rent: Option<f64>,
    /// `B23025_002E` population in the labor force.
    pub labor_force: Option<f64>,
    /// `B23025_005E` unemployed civilians.
    pub unemployed: Option<f64>,
    /// `B15003_022E` bachelor's degree holders.
    pub bachelors: Option<f64>,
    /// `B15003_023E` master's degree holders.
    pub masters: Option<f64>,
    /// `B15003_024E` professional degree holders.
    pub professional: Option<f64>,
    /// `B15003_025E` doctorate holders.
    pub doctorate: Option<f64>,
}

impl AcsAggregates {
    /// Sum of bachelor's-or-higher degree holders.
    ///
    /// `None` only if every degree cell is missing.
    #[must_use]
    pub fn degree_holders(&self) -> Option<f64> {
        [
            self.bachelors,
            self.masters,
            self.professional,
            self.doctorate,
        ]
        .into_iter()
        .flatten()
        .reduce(|a, b| a + b)
    }
}

/// Validated demographic indicators for one geography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicProfile {
    pub population: Tagged<u64>,
    /// USD per year.
    pub median_income: Tagged<f64>,
    /// USD.
    pub median_home_value: Tagged<f64>,
    /// USD per month.
    pub median_rent: Tagged<f64>,
    /// Percent of the labor force that is employed, `[0, 100]`.
    pub employment_rate: Tagged<f64>,
    /// Percent of the population holding a bachelor's degree or higher,
    /// `[0, 100]`. Absent when the provider returned no degree counts.
    pub education_level: Option<Tagged<f64>>,
    /// Median home value over median income.
    pub income_to_housing_ratio: Tagged<f64>,
    pub data_tier: DataTier,
    /// GEOID the figures describe (`"51153"`, `"51"`, or `"US"`).
    pub geoid: String,
    /// Human-readable origin of the figures.
    pub source: String,
}

/// Source label of [`DemographicProfile::national_estimate`].
pub const NATIONAL_ESTIMATE_SOURCE: &str = "estimate (US national ACS medians)";

impl DemographicProfile {
    /// US national figures from the 2018-2022 ACS 5-year release, every
    /// field tagged estimated.
    #[must_use]
    pub fn national_estimate() -> Self {
        Self {
            population: Tagged::estimated(331_097_593),
            median_income: Tagged::estimated(75_149.0),
            median_home_value: Tagged::estimated(281_900.0),
            median_rent: Tagged::estimated(1_268.0),
            employment_rate: Tagged::estimated(94.7),
            education_level: Some(Tagged::estimated(23.4)),
            income_to_housing_ratio: Tagged::estimated(3.8),
            data_tier: DataTier::Estimate,
            geoid: "US".to_string(),
            source: NATIONAL_ESTIMATE_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use property_intel_models::Provenance;

    use super::*;

    #[test]
    fn tiers_order_finest_first() {
        assert!(DataTier::County < DataTier::State);
        assert!(DataTier::State < DataTier::Estimate);
        assert_eq!(DataTier::County.to_string(), "county");
    }

    #[test]
    fn geography_geoid() {
        let county = AcsGeography::County {
            state_fips: "51".to_string(),
            county_fips: "153".to_string(),
        };
        assert_eq!(county.geoid(), "51153");
        assert_eq!(county.tier(), DataTier::County);
        assert_eq!(county.to_string(), "county 51153");

        let state = AcsGeography::State {
            state_fips: "51".to_string(),
        };
        assert_eq!(state.geoid(), "51");
        assert_eq!(state.tier(), DataTier::State);
    }

    #[test]
    fn degree_holders_sums_present_cells() {
        let row = AcsAggregates {
            bachelors: Some(100.0),
            doctorate: Some(5.0),
            ..AcsAggregates::default()
        };
        assert_eq!(row.degree_holders(), Some(105.0));
        assert_eq!(AcsAggregates::default().degree_holders(), None);
    }

    #[test]
    fn national_estimate_is_entirely_estimated() {
        let profile = DemographicProfile::national_estimate();
        assert_eq!(profile.data_tier, DataTier::Estimate);
        assert_eq!(profile.population.provenance, Provenance::Estimated);
        assert_eq!(profile.median_rent.provenance, Provenance::Estimated);
        assert_eq!(
            profile.education_level.map(|t| t.provenance),
            Some(Provenance::Estimated)
        );
        assert!(profile.source.contains("estimate"));
    }

    #[test]
    fn profile_serializes_camel_case() {
        let json = serde_json::to_value(DemographicProfile::national_estimate()).unwrap();
        assert_eq!(json["dataTier"], "estimate");
        assert_eq!(json["medianIncome"]["provenance"], "estimated");
    }
}
