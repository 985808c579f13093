#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding result types.
//!
//! A [`GeocodeResult`] is the output of address resolution: the
//! provider's formatted address, WGS84 coordinates, and a flat map of
//! typed administrative components that downstream stages use to
//! determine the state and county.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which provider resolved an address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeocoderId {
    /// Google Geocoding API.
    Google,
    /// Nominatim / `OpenStreetMap`.
    Nominatim,
}

/// How precisely the coordinates pin down the address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocationPrecision {
    /// Exact parcel or building.
    Rooftop,
    /// Interpolated between two points on a street segment.
    RangeInterpolated,
    /// Center of a line or polygon (street, neighbourhood).
    GeometricCenter,
    /// Anything coarser.
    Approximate,
}

impl LocationPrecision {
    /// Maps a Google `geometry.location_type` value.
    ///
    /// Unknown values map to [`Self::Approximate`].
    #[must_use]
    pub fn from_google(location_type: &str) -> Self {
        match location_type {
            "ROOFTOP" => Self::Rooftop,
            "RANGE_INTERPOLATED" => Self::RangeInterpolated,
            "GEOMETRIC_CENTER" => Self::GeometricCenter,
            _ => Self::Approximate,
        }
    }
}

/// Category of an administrative address component.
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
pub enum ComponentKind {
    /// House number.
    StreetNumber,
    /// Street name.
    Route,
    /// Named neighbourhood.
    Neighborhood,
    /// Sub-locality (borough, suburb).
    Sublocality,
    /// City, town, or village.
    Locality,
    /// Second-level administrative area (US county).
    County,
    /// First-level administrative area (US state), long form.
    State,
    /// Provider-supplied short code for the state (e.g. `"VA"`).
    StateCode,
    /// ZIP code.
    PostalCode,
    /// Country name.
    Country,
}

/// Flat map of administrative components, one value per category.
///
/// Built with [`AddressComponents::insert_first`], so the first component
/// of a given category that a provider lists is the one kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressComponents(BTreeMap<ComponentKind, String>);

impl AddressComponents {
    /// Creates an empty component map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records a component unless the category is already filled.
    ///
    /// Blank values are ignored. Returns `true` if the value was stored.
    pub fn insert_first(&mut self, kind: ComponentKind, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.0.contains_key(&kind) {
            return false;
        }
        self.0.insert(kind, value.to_string());
        true
    }

    /// Returns the component for a category.
    #[must_use]
    pub fn get(&self, kind: ComponentKind) -> Option<&str> {
        self.0.get(&kind).map(String::as_str)
    }

    /// Street line built from house number and route.
    #[must_use]
    pub fn street(&self) -> Option<String> {
        match (self.get(ComponentKind::StreetNumber), self.get(ComponentKind::Route)) {
            (Some(number), Some(route)) => Some(format!("{number} {route}")),
            (None, Some(route)) => Some(route.to_string()),
            (Some(_) | None, None) => None,
        }
    }

    /// Number of categories filled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no categories are filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates categories in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKind, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// A resolved location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    /// The input address as supplied by the caller.
    pub input_address: String,
    /// The canonical address returned by the provider.
    pub formatted_address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Administrative components of the best-ranked result.
    pub components: AddressComponents,
    /// How precise the coordinates are.
    pub precision: LocationPrecision,
    /// Provider-specific place identifier, if any.
    pub place_id: Option<String>,
    /// Which provider produced this result.
    pub provider: GeocoderId,
}
