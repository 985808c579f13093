//! State extraction from a geocode result.
//!
//! Sources are tried strongest first and the first hit wins:
//!
//! 1. the geocoder's state component;
//! 2. a `", ST 12345"` pattern in the formatted address, then in the
//!    address as typed;
//! 3. the provider's short state code;
//! 4. a comma-separated segment of the formatted address that is a full
//!    state name.

use std::sync::LazyLock;

use property_intel_geocoder_models::{AddressComponents, ComponentKind, GeocodeResult};
use property_intel_geography_models::StateSource;
use property_intel_geography_models::fips::{self, UsState};
use regex::Regex;

/// Two capital letters followed by a ZIP or ZIP+4, after a comma.
static POSTAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",[ \t]*([A-Z]{2})[ \t]+[0-9]{5}(?:-[0-9]{4})?").expect("valid regex")
});

/// A state together with where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMatch {
    pub state: &'static UsState,
    pub source: StateSource,
}

/// Runs the extraction chain over a geocode result.
#[must_use]
pub fn extract_state(geocode: &GeocodeResult) -> Option<StateMatch> {
    from_component(&geocode.components)
        .or_else(|| from_postal_pattern(&geocode.formatted_address))
        .or_else(|| from_postal_pattern(&geocode.input_address))
        .or_else(|| from_provider_hint(&geocode.components))
        .or_else(|| from_address_segment(&geocode.formatted_address))
}

fn from_component(components: &AddressComponents) -> Option<StateMatch> {
    let state = fips::lookup(components.get(ComponentKind::State)?)?;
    Some(StateMatch {
        state,
        source: StateSource::Component,
    })
}

/// Uses the last valid `", ST 12345"` occurrence, since the state and
/// ZIP sit near the end of a US address.
fn from_postal_pattern(address: &str) -> Option<StateMatch> {
    let state = POSTAL_PATTERN
        .captures_iter(address)
        .filter_map(|caps| fips::by_abbr(caps.get(1)?.as_str()))
        .last()?;
    Some(StateMatch {
        state,
        source: StateSource::PostalPattern,
    })
}

fn from_provider_hint(components: &AddressComponents) -> Option<StateMatch> {
    let state = fips::by_abbr(components.get(ComponentKind::StateCode)?)?;
    Some(StateMatch {
        state,
        source: StateSource::ProviderHint,
    })
}

/// Scans segments from the end so a trailing state wins over a city
/// that shares its name.
fn from_address_segment(address: &str) -> Option<StateMatch> {
    let state = address
        .rsplit(',')
        .map(str::trim)
        .filter(|segment| segment.len() > 2)
        .find_map(fips::by_name)?;
    Some(StateMatch {
        state,
        source: StateSource::AddressSegment,
    })
}

#[cfg(test)]
mod tests {
    use property_intel_geocoder_models::{GeocoderId, LocationPrecision};

    use super::*;

    fn geocode(formatted: &str, components: &[(ComponentKind, &str)]) -> GeocodeResult {
        let mut parsed = AddressComponents::new();
        for (kind, value) in components {
            parsed.insert_first(*kind, value);
        }
        GeocodeResult {
            input_address: "input".to_string(),
            formatted_address: formatted.to_string(),
            latitude: 38.846,
            longitude: -77.627,
            components: parsed,
            precision: LocationPrecision::Rooftop,
            place_id: None,
            provider: GeocoderId::Google,
        }
    }

    #[test]
    fn component_wins() {
        let found = extract_state(&geocode(
            "3650 Dunigan Ct, Catharpin, MD 20143, USA",
            &[(ComponentKind::State, "Virginia")],
        ))
        .unwrap();
        assert_eq!(found.state.abbr, "VA");
        assert_eq!(found.source, StateSource::Component);
    }

    #[test]
    fn postal_pattern_when_component_missing() {
        let found = extract_state(&geocode(
            "3650 Dunigan Ct, Catharpin, VA 20143-1234, USA",
            &[(ComponentKind::StateCode, "MD")],
        ))
        .unwrap();
        assert_eq!(found.state.fips, "51");
        assert_eq!(found.source, StateSource::PostalPattern);
    }

    #[test]
    fn postal_pattern_falls_back_to_input_address() {
        let mut result = geocode("Catharpin", &[]);
        result.input_address = "3650 Dunigan Ct, Catharpin, VA 20143".to_string();
        let found = extract_state(&result).unwrap();
        assert_eq!(found.state.abbr, "VA");
        assert_eq!(found.source, StateSource::PostalPattern);
    }

    #[test]
    fn unknown_postal_code_is_skipped() {
        let found = extract_state(&geocode(
            "1 Main St, Springfield, IL 62701, ZZ 99999",
            &[],
        ))
        .unwrap();
        assert_eq!(found.state.abbr, "IL");
    }

    #[test]
    fn provider_hint_then_segment() {
        let found =
            extract_state(&geocode("Somewhere", &[(ComponentKind::StateCode, "TX")])).unwrap();
        assert_eq!(found.state.abbr, "TX");
        assert_eq!(found.source, StateSource::ProviderHint);

        let found = extract_state(&geocode(
            "Dunigan Court, Catharpin, Prince William County, Virginia, United States",
            &[],
        ))
        .unwrap();
        assert_eq!(found.state.abbr, "VA");
        assert_eq!(found.source, StateSource::AddressSegment);
    }

    #[test]
    fn nothing_recognizable() {
        assert_eq!(extract_state(&geocode("10 Downing St, London, UK", &[])), None);
    }
}
