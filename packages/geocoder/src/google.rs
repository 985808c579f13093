//! Google Geocoding API client.
//!
//! Requires an API key (`GOOGLE_MAPS_API_KEY`). Only the best-ranked
//! result is used.
//!
//! See <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use async_trait::async_trait;
use property_intel_geocoder_models::{
    AddressComponents, ComponentKind, GeocodeResult, GeocoderId, LocationPrecision,
};
use property_intel_provider::http;

use crate::{GeocodeError, GeocodingProvider};

/// Google Geocoding API backend.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Creates a client for the given API base URL
    /// (e.g. `"https://maps.googleapis.com/maps/api"`).
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl GeocodingProvider for GoogleGeocoder {
    fn id(&self) -> GeocoderId {
        GeocoderId::Google
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeResult, GeocodeError> {
        let url = format!("{}/geocode/json", self.base_url);
        let body = http::send_json(
            self.client
                .get(&url)
                .query(&[("address", address), ("key", self.api_key.as_str())]),
        )
        .await?;

        parse_response(&body, address)
    }
}

/// Parses a Geocoding API JSON response.
fn parse_response(body: &serde_json::Value, address: &str) -> Result<GeocodeResult, GeocodeError> {
    let status = body["status"].as_str().unwrap_or_default();
    match status {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(GeocodeError::NoResult {
                address: address.to_string(),
            });
        }
        "" => return Err(GeocodeError::malformed("missing status field")),
        other => {
            return Err(GeocodeError::Rejected {
                status: other.to_string(),
                message: body["error_message"].as_str().map(String::from),
            });
        }
    }

    let Some(first) = body["results"].as_array().and_then(|r| r.first()) else {
        return Err(GeocodeError::NoResult {
            address: address.to_string(),
        });
    };

    let location = &first["geometry"]["location"];
    let latitude = location["lat"]
        .as_f64()
        .ok_or_else(|| GeocodeError::malformed("missing geometry.location.lat"))?;
    let longitude = location["lng"]
        .as_f64()
        .ok_or_else(|| GeocodeError::malformed("missing geometry.location.lng"))?;

    let formatted_address = first["formatted_address"]
        .as_str()
        .ok_or_else(|| GeocodeError::malformed("missing formatted_address"))?
        .to_string();

    let precision = first["geometry"]["location_type"]
        .as_str()
        .map_or(LocationPrecision::Approximate, LocationPrecision::from_google);

    let components = first["address_components"]
        .as_array()
        .map(Vec::as_slice)
        .map(parse_components)
        .unwrap_or_default();

    Ok(GeocodeResult {
        input_address: address.to_string(),
        formatted_address,
        latitude,
        longitude,
        components,
        precision,
        place_id: first["place_id"].as_str().map(String::from),
        provider: GeocoderId::Google,
    })
}

/// Maps a Google component type to our category.
fn component_kind(google_type: &str) -> Option<ComponentKind> {
    Some(match google_type {
        "street_number" => ComponentKind::StreetNumber,
        "route" => ComponentKind::Route,
        "neighborhood" => ComponentKind::Neighborhood,
        "sublocality" | "sublocality_level_1" => ComponentKind::Sublocality,
        "locality" => ComponentKind::Locality,
        "administrative_area_level_2" => ComponentKind::County,
        "administrative_area_level_1" => ComponentKind::State,
        "postal_code" => ComponentKind::PostalCode,
        "country" => ComponentKind::Country,
        _ => return None,
    })
}

/// Flattens `address_components` into one value per category.
///
/// Each component is classified by the first of its `types` that maps
/// to a category, and the first component seen for a category wins.
fn parse_components(list: &[serde_json::Value]) -> AddressComponents {
    let mut components = AddressComponents::new();

    for component in list {
        let Some(kind) = component["types"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(serde_json::Value::as_str)
            .find_map(component_kind)
        else {
            continue;
        };

        let long_name = component["long_name"].as_str().unwrap_or_default();
        let inserted = components.insert_first(kind, long_name);

        if inserted && kind == ComponentKind::State {
            if let Some(short) = component["short_name"].as_str() {
                components.insert_first(ComponentKind::StateCode, short);
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catharpin() -> serde_json::Value {
        serde_json::json!({
            "status": "OK",
            "results": [{
                "formatted_address": "3650 Dunigan Ct, Catharpin, VA 20143, USA",
                "place_id": "ChIJ-catharpin",
                "geometry": {
                    "location": { "lat": 38.846_11, "lng": -77.627_35 },
                    "location_type": "ROOFTOP"
                },
                "address_components": [
                    {
                        "long_name": "3650",
                        "short_name": "3650",
                        "types": ["street_number"]
                    },
                    {
                        "long_name": "Dunigan Court",
                        "short_name": "Dunigan Ct",
                        "types": ["route"]
                    },
                    {
                        "long_name": "Catharpin",
                        "short_name": "Catharpin",
                        "types": ["locality", "political"]
                    },
                    {
                        "long_name": "Prince William County",
                        "short_name": "Prince William County",
                        "types": ["administrative_area_level_2", "political"]
                    },
                    {
                        "long_name": "Virginia",
                        "short_name": "VA",
                        "types": ["administrative_area_level_1", "political"]
                    },
                    {
                        "long_name": "United States",
                        "short_name": "US",
                        "types": ["country", "political"]
                    },
                    {
                        "long_name": "20143",
                        "short_name": "20143",
                        "types": ["postal_code"]
                    }
                ]
            }]
        })
    }

    #[test]
    fn parses_best_result() {
        let result = parse_response(&catharpin(), "3650 Dunigan Ct, Catharpin, VA 20143").unwrap();
        assert!((result.latitude - 38.846_11).abs() < 1e-6);
        assert!((result.longitude - -77.627_35).abs() < 1e-6);
        assert_eq!(result.precision, LocationPrecision::Rooftop);
        assert_eq!(result.place_id.as_deref(), Some("ChIJ-catharpin"));
        assert_eq!(result.provider, GeocoderId::Google);

        let c = &result.components;
        assert_eq!(c.get(ComponentKind::State), Some("Virginia"));
        assert_eq!(c.get(ComponentKind::StateCode), Some("VA"));
        assert_eq!(c.get(ComponentKind::County), Some("Prince William County"));
        assert_eq!(c.get(ComponentKind::Locality), Some("Catharpin"));
        assert_eq!(c.get(ComponentKind::PostalCode), Some("20143"));
        assert_eq!(c.street().as_deref(), Some("3650 Dunigan Court"));
    }

    #[test]
    fn first_component_per_type_wins() {
        let list = serde_json::json!([
            { "long_name": "Arlington County", "types": ["administrative_area_level_2"] },
            { "long_name": "Fairfax County", "types": ["administrative_area_level_2"] },
            { "long_name": "Clarendon", "types": ["neighborhood", "sublocality"] }
        ]);
        let components = parse_components(list.as_array().unwrap());
        assert_eq!(components.get(ComponentKind::County), Some("Arlington County"));
        assert_eq!(components.get(ComponentKind::Neighborhood), Some("Clarendon"));
        assert_eq!(components.get(ComponentKind::Sublocality), None);
    }

    #[test]
    fn zero_results_is_no_result() {
        let body = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
        assert!(matches!(
            parse_response(&body, "nowhere"),
            Err(GeocodeError::NoResult { .. })
        ));
    }

    #[test]
    fn denied_request_is_rejected() {
        let body = serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        });
        let err = parse_response(&body, "x").unwrap_err();
        assert!(matches!(
            err,
            GeocodeError::Rejected { ref status, .. } if status == "REQUEST_DENIED"
        ));
    }

    #[test]
    fn missing_location_is_malformed() {
        let body = serde_json::json!({
            "status": "OK",
            "results": [{ "formatted_address": "x", "geometry": {} }]
        });
        assert!(matches!(
            parse_response(&body, "x"),
            Err(GeocodeError::Malformed { .. })
        ));
    }
}
