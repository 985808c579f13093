#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US state and county identity for a geocoded property.
//!
//! An [`AdministrativeRegion`] always has a state. The county is optional:
//! [`CountyStatus`] records why it is missing when it is.

pub mod county;
pub mod fips;

use property_intel_models::Provenance;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Where the state of a region was read from, strongest first.
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
pub enum StateSource {
    /// The geocoder's state component.
    Component,
    /// The `", ST 12345"` pattern in the formatted address.
    PostalPattern,
    /// The provider's short state code (Google `short_name`, Nominatim
    /// ISO 3166-2).
    ProviderHint,
    /// A comma-separated address segment spelling out a state name.
    AddressSegment,
}

impl StateSource {
    /// Provenance of a state read from this source.
    #[must_use]
    pub const fn provenance(self) -> Provenance {
        match self {
            Self::Component => Provenance::Verified,
            Self::PostalPattern | Self::ProviderHint | Self::AddressSegment => {
                Provenance::Derived
            }
        }
    }
}

/// How much the resolved region can be trusted.
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
pub enum RegionConfidence {
    High,
    Medium,
    Low,
}

impl RegionConfidence {
    /// Combines state source strength with whether a county was found.
    ///
    /// | state source                   | county | confidence |
    /// |--------------------------------|--------|------------|
    /// | component                      | yes    | high       |
    /// | component                      | no     | medium     |
    /// | postal pattern / provider hint | yes    | medium     |
    /// | anything else                  |        | low        |
    #[must_use]
    pub const fn assess(state_source: StateSource, county_resolved: bool) -> Self {
        match (state_source, county_resolved) {
            (StateSource::Component, true) => Self::High,
            (StateSource::Component, false)
            | (StateSource::PostalPattern | StateSource::ProviderHint, true) => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Why a region does or does not carry a county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CountyStatus {
    /// The county FIPS code is known.
    Resolved,
    /// Several counties matched the name and none could be preferred.
    Ambiguous {
        /// Full names of the matching counties.
        candidates: Vec<String>,
    },
    /// The county listing had no match for the name.
    NotFound,
    /// The geocoder produced no usable county name.
    NoCandidate,
    /// The county listing could not be fetched.
    LookupFailed {
        /// Error text from the listing provider.
        reason: String,
    },
}

/// State and (optionally) county identity of a geocoded address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrativeRegion {
    /// Two-letter state code (e.g. `"VA"`).
    pub state_code: String,
    /// Two-digit state FIPS code (e.g. `"51"`).
    pub state_fips: String,
    /// Full state name (e.g. `"Virginia"`).
    pub state_name: String,
    pub state_source: StateSource,
    pub confidence: RegionConfidence,
    /// Normalized county name (e.g. `"prince william"`), if the geocoder
    /// gave one.
    pub county_name: Option<String>,
    /// Three-digit county FIPS code, present only when
    /// `county_status` is [`CountyStatus::Resolved`].
    pub county_fips: Option<String>,
    /// Listing name of the matched county
    /// (e.g. `"Prince William County, Virginia"`).
    pub county_full_name: Option<String>,
    pub county_status: CountyStatus,
}

impl AdministrativeRegion {
    /// Provenance of the state identity.
    #[must_use]
    pub const fn state_provenance(&self) -> Provenance {
        self.state_source.provenance()
    }

    /// Returns the county FIPS code only if it is a well-formed
    /// three-digit code and the county was resolved.
    #[must_use]
    pub fn resolved_county_fips(&self) -> Option<&str> {
        if self.county_status != CountyStatus::Resolved {
            return None;
        }
        self.county_fips
            .as_deref()
            .filter(|fips| fips.len() == 3 && fips.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Five-digit county GEOID (state + county FIPS).
    #[must_use]
    pub fn county_geoid(&self) -> Option<String> {
        self.resolved_county_fips()
            .map(|county| format!("{}{county}", self.state_fips))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn virginia(county_fips: Option<&str>, county_status: CountyStatus) -> AdministrativeRegion {
        AdministrativeRegion {
            state_code: "VA".to_string(),
            state_fips: "51".to_string(),
            state_name: "Virginia".to_string(),
            state_source: StateSource::Component,
            confidence: RegionConfidence::High,
            county_name: Some("prince william".to_string()),
            county_fips: county_fips.map(String::from),
            county_full_name: None,
            county_status,
        }
    }

    #[test]
    fn geoid_requires_resolved_county() {
        let region = virginia(Some("153"), CountyStatus::Resolved);
        assert_eq!(region.county_geoid().as_deref(), Some("51153"));

        let region = virginia(Some("153"), CountyStatus::NotFound);
        assert_eq!(region.county_geoid(), None);
    }

    #[test]
    fn malformed_county_fips_is_ignored() {
        let region = virginia(Some("15"), CountyStatus::Resolved);
        assert_eq!(region.resolved_county_fips(), None);
        let region = virginia(Some("1a3"), CountyStatus::Resolved);
        assert_eq!(region.resolved_county_fips(), None);
    }

    #[test]
    fn confidence_table() {
        assert_eq!(
            RegionConfidence::assess(StateSource::Component, true),
            RegionConfidence::High
        );
        assert_eq!(
            RegionConfidence::assess(StateSource::Component, false),
            RegionConfidence::Medium
        );
        assert_eq!(
            RegionConfidence::assess(StateSource::PostalPattern, true),
            RegionConfidence::Medium
        );
        assert_eq!(
            RegionConfidence::assess(StateSource::ProviderHint, false),
            RegionConfidence::Low
        );
        assert_eq!(
            RegionConfidence::assess(StateSource::AddressSegment, true),
            RegionConfidence::Low
        );
    }

    #[test]
    fn state_provenance_follows_source() {
        assert_eq!(StateSource::Component.provenance(), Provenance::Verified);
        assert_eq!(StateSource::PostalPattern.provenance(), Provenance::Derived);
    }

    #[test]
    fn county_status_serializes_with_tag() {
        let json = serde_json::to_value(CountyStatus::Ambiguous {
            candidates: vec!["Washington Parish, Louisiana".to_string()],
        })
        .unwrap();
        assert_eq!(json["status"], "ambiguous");
        assert_eq!(json["candidates"][0], "Washington Parish, Louisiana");

        let json = serde_json::to_value(StateSource::PostalPattern).unwrap();
        assert_eq!(json, "postal_pattern");
    }
}
