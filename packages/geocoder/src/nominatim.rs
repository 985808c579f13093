//! Nominatim / OpenStreetMap geocoder client.
//!
//! Keyless fallback used when no Google key is configured. The public
//! instance allows **1 request per second** and rejects requests without
//! an identifying user agent; the shared HTTP client sets one.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;
use property_intel_geocoder_models::{
    AddressComponents, ComponentKind, GeocodeResult, GeocoderId, LocationPrecision,
};
use property_intel_provider::http;

use crate::{GeocodeError, GeocodingProvider};

/// Nominatim free-form search backend.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Creates a client for the given search endpoint
    /// (e.g. `"https://nominatim.openstreetmap.org/search"`).
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    fn id(&self) -> GeocoderId {
        GeocoderId::Nominatim
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let body = http::send_json(self.client.get(&self.base_url).query(&[
            ("q", address),
            ("countrycodes", "us"),
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("limit", "1"),
        ]))
        .await?;

        parse_response(&body, address)
    }
}

/// Address-detail keys mapped to categories, in precedence order.
///
/// Locality falls back from city to town to village to hamlet; the first
/// present key wins because [`AddressComponents::insert_first`] ignores
/// later values.
const DETAIL_KEYS: &[(&str, ComponentKind)] = &[
    ("house_number", ComponentKind::StreetNumber),
    ("road", ComponentKind::Route),
    ("neighbourhood", ComponentKind::Neighborhood),
    ("suburb", ComponentKind::Sublocality),
    ("city", ComponentKind::Locality),
    ("town", ComponentKind::Locality),
    ("village", ComponentKind::Locality),
    ("hamlet", ComponentKind::Locality),
    ("county", ComponentKind::County),
    ("state", ComponentKind::State),
    ("postcode", ComponentKind::PostalCode),
    ("country", ComponentKind::Country),
];

/// Parses Nominatim `jsonv2` response.
fn parse_response(body: &serde_json::Value, address: &str) -> Result<GeocodeResult, GeocodeError> {
    let results = body
        .as_array()
        .ok_or_else(|| GeocodeError::malformed("Nominatim response is not an array"))?;

    let Some(first) = results.first() else {
        return Err(GeocodeError::NoResult {
            address: address.to_string(),
        });
    };

    let latitude = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::malformed("Missing lat in Nominatim response"))?;

    let longitude = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| GeocodeError::malformed("Missing lon in Nominatim response"))?;

    let formatted_address = first["display_name"]
        .as_str()
        .ok_or_else(|| GeocodeError::malformed("Missing display_name in Nominatim response"))?
        .to_string();

    let details = &first["address"];
    let mut components = AddressComponents::new();
    for (key, kind) in DETAIL_KEYS {
        if let Some(value) = details[*key].as_str() {
            components.insert_first(*kind, value);
        }
    }
    if let Some(code) = details["ISO3166-2-lvl4"]
        .as_str()
        .and_then(|iso| iso.strip_prefix("US-"))
    {
        components.insert_first(ComponentKind::StateCode, code);
    }

    let precision = match first["type"].as_str() {
        Some("house") => LocationPrecision::Rooftop,
        _ => LocationPrecision::Approximate,
    };

    Ok(GeocodeResult {
        input_address: address.to_string(),
        formatted_address,
        latitude,
        longitude,
        components,
        precision,
        place_id: first["place_id"].as_u64().map(|id| id.to_string()),
        provider: GeocoderId::Nominatim,
    })
}
