#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The merged property profile returned by the resolution pipeline.

use std::collections::BTreeMap;

use property_intel_climate_models::{ClimateOrigin, ClimateRiskProfile};
use property_intel_demographics_models::{DataTier, DemographicProfile};
use property_intel_geocoder_models::GeocodeResult;
use property_intel_geography_models::AdministrativeRegion;
use property_intel_models::Provenance;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How much of a profile relied on fallback behaviour.
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
pub enum DegradationLevel {
    /// County demographics and live climate.
    Full,
    /// Exactly one of: state-level demographics, estimated climate.
    Partial,
    /// Both degraded, or demographics missing or estimated.
    Minimal,
}

impl DegradationLevel {
    /// Grades a profile from its demographic tier (`None` when the fetch
    /// failed) and climate origin.
    #[must_use]
    pub const fn assess(tier: Option<DataTier>, climate: ClimateOrigin) -> Self {
        match (tier, climate) {
            (Some(DataTier::County), ClimateOrigin::Live) => Self::Full,
            (Some(DataTier::State), ClimateOrigin::Live)
            | (Some(DataTier::County), ClimateOrigin::Estimate) => Self::Partial,
            _ => Self::Minimal,
        }
    }
}

/// Steps of one resolution run, in execution order. Demographics and
/// climate run concurrently.
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
pub enum PipelineStage {
    Geocode,
    Region,
    Demographics,
    Climate,
    Assemble,
}

/// How a stage ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StageOutcome {
    /// Produced its best result.
    Completed,
    /// Produced a fallback result.
    Degraded,
    /// Produced nothing.
    Failed,
}

/// Everything known about one property address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyProfile {
    /// Address as supplied by the caller.
    pub address: String,
    pub geocode: GeocodeResult,
    pub region: AdministrativeRegion,
    /// Absent when every demographic tier failed.
    pub demographics: Option<DemographicProfile>,
    /// Why `demographics` is absent or estimated.
    pub demographics_error: Option<String>,
    pub climate: ClimateRiskProfile,
    pub degradation_level: DegradationLevel,
}

impl PropertyProfile {
    /// Flat map of field path to provenance.
    ///
    /// Paths follow the serialized structure in `snake_case`, with the
    /// `value` level of tagged fields dropped (`"demographics.median_rent"`,
    /// `"climate.flood.score"`). Every numeric field present in the
    /// profile has exactly one entry.
    #[must_use]
    pub fn provenance(&self) -> BTreeMap<&'static str, Provenance> {
        let mut map = BTreeMap::new();

        map.insert("geocode.formatted_address", Provenance::Verified);
        map.insert("geocode.latitude", Provenance::Verified);
        map.insert("geocode.longitude", Provenance::Verified);

        let state = self.region.state_provenance();
        map.insert("region.state_code", state);
        map.insert("region.state_fips", state);
        if self.region.resolved_county_fips().is_some() {
            map.insert("region.county_fips", Provenance::Verified);
        }

        if let Some(d) = &self.demographics {
            map.insert("demographics.population", d.population.provenance);
            map.insert("demographics.median_income", d.median_income.provenance);
            map.insert(
                "demographics.median_home_value",
                d.median_home_value.provenance,
            );
            map.insert("demographics.median_rent", d.median_rent.provenance);
            map.insert("demographics.employment_rate", d.employment_rate.provenance);
            if let Some(education) = &d.education_level {
                map.insert("demographics.education_level", education.provenance);
            }
            map.insert(
                "demographics.income_to_housing_ratio",
                d.income_to_housing_ratio.provenance,
            );
        }

        let c = &self.climate;
        map.insert("climate.flood.score", c.flood.score.provenance);
        map.insert("climate.temperature.score", c.temperature.score.provenance);
        map.insert(
            "climate.precipitation.score",
            c.precipitation.score.provenance,
        );
        map.insert("climate.overall_score", c.overall_score.provenance);

        if let Some(w) = &c.weather {
            let current = [
                ("climate.weather.current_temperature_c", w.current_temperature_c),
                ("climate.weather.current_humidity_pct", w.current_humidity_pct),
                (
                    "climate.weather.current_precipitation_mm",
                    w.current_precipitation_mm,
                ),
            ];
            for (key, value) in current {
                if value.is_some() {
                    map.insert(key, Provenance::Verified);
                }
            }
            // Aggregated over the daily forecast series.
            map.insert("climate.weather.avg_high_c", Provenance::Derived);
            map.insert("climate.weather.avg_low_c", Provenance::Derived);
            map.insert("climate.weather.weekly_precipitation_mm", Provenance::Derived);
            map.insert("climate.weather.days", Provenance::Derived);
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degradation_table() {
        use ClimateOrigin::{Estimate, Live};

        assert_eq!(
            DegradationLevel::assess(Some(DataTier::County), Live),
            DegradationLevel::Full
        );
        assert_eq!(
            DegradationLevel::assess(Some(DataTier::State), Live),
            DegradationLevel::Partial
        );
        assert_eq!(
            DegradationLevel::assess(Some(DataTier::County), Estimate),
            DegradationLevel::Partial
        );
        assert_eq!(
            DegradationLevel::assess(Some(DataTier::State), Estimate),
            DegradationLevel::Minimal
        );
        assert_eq!(
            DegradationLevel::assess(None, Live),
            DegradationLevel::Minimal
        );
        assert_eq!(
            DegradationLevel::assess(Some(DataTier::Estimate), Live),
            DegradationLevel::Minimal
        );
    }

    #[test]
    fn stage_names() {
        assert_eq!(PipelineStage::Demographics.to_string(), "demographics");
        assert_eq!(
            serde_json::to_value(DegradationLevel::Partial).unwrap(),
            "partial"
        );
        assert_eq!(StageOutcome::Degraded.as_ref(), "degraded");
    }
}
