//! Open-Meteo forecast client.
//!
//! Keyless. Requests current conditions plus a daily forecast and folds
//! it into a [`WeatherSummary`].
//!
//! See <https://open-meteo.com/en/docs>

use async_trait::async_trait;
use property_intel_climate_models::WeatherSummary;
use property_intel_provider::http;
use property_intel_provider::registry::{self, ProviderConfig, ServiceKind};
use property_intel_provider::ProviderError;

use crate::{ClimateError, WeatherProvider};

/// Open-Meteo `/forecast` backend.
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
    forecast_days: u8,
}

impl OpenMeteoClient {
    /// Creates a client for the given API base URL
    /// (e.g. `"https://api.open-meteo.com/v1"`).
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String, forecast_days: u8) -> Self {
        Self {
            client,
            base_url,
            forecast_days,
        }
    }

    /// Builds a client from the first enabled weather service.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::NotConfigured`] if no enabled Open-Meteo
    /// service is registered.
    pub fn from_registry(client: &reqwest::Client) -> Result<Self, ProviderError> {
        registry::enabled_of_kind(ServiceKind::Weather)
            .into_iter()
            .find_map(|service| match service.provider {
                ProviderConfig::OpenMeteo {
                    base_url,
                    forecast_days,
                } => Some(Self::new(client.clone(), base_url, forecast_days)),
                _ => None,
            })
            .ok_or_else(|| ProviderError::NotConfigured {
                kind: ServiceKind::Weather.to_string(),
            })
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSummary, ClimateError> {
        let url = format!("{}/forecast", self.base_url.trim_end_matches('/'));
        let body = http::send_json(self.client.get(&url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m,precipitation".to_string(),
            ),
            (
                "daily",
                "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
            ),
            ("forecast_days", self.forecast_days.to_string()),
            ("timezone", "auto".to_string()),
        ]))
        .await?;

        parse_forecast(&body)
    }
}

/// Non-null numbers of a daily series.
fn series(daily: &serde_json::Value, name: &str) -> Result<Vec<f64>, ClimateError> {
    let values: Vec<f64> = daily[name]
        .as_array()
        .ok_or_else(|| ClimateError::malformed(format!("missing daily.{name}")))?
        .iter()
        .filter_map(serde_json::Value::as_f64)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return Err(ClimateError::malformed(format!("daily.{name} has no values")));
    }
    Ok(values)
}

#[allow(clippy::cast_precision_loss)] // at most 16 forecast days
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Parses a `/forecast` response.
///
/// # Errors
///
/// Returns [`ClimateError::Malformed`] if a daily series is missing or
/// has no usable entries.
pub fn parse_forecast(body: &serde_json::Value) -> Result<WeatherSummary, ClimateError> {
    let daily = &body["daily"];
    let highs = series(daily, "temperature_2m_max")?;
    let lows = series(daily, "temperature_2m_min")?;
    let precipitation = series(daily, "precipitation_sum")?;

    let current = &body["current"];
    Ok(WeatherSummary {
        current_temperature_c: current["temperature_2m"].as_f64(),
        current_humidity_pct: current["relative_humidity_2m"].as_f64(),
        current_precipitation_mm: current["precipitation"].as_f64(),
        avg_high_c: mean(&highs),
        avg_low_c: mean(&lows),
        weekly_precipitation_mm: precipitation.iter().sum(),
        days: highs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_forecast() {
        let body = serde_json::json!({
            "latitude": 38.84,
            "longitude": -77.62,
            "current": {
                "time": "2026-10-18T14:00",
                "temperature_2m": 17.4,
                "relative_humidity_2m": 61,
                "precipitation": 0.0
            },
            "daily": {
                "time": ["2026-10-18", "2026-10-19", "2026-10-20"],
                "temperature_2m_max": [20.0, 22.0, 24.0],
                "temperature_2m_min": [8.0, 10.0, 12.0],
                "precipitation_sum": [0.0, 4.5, 1.5]
            }
        });
        let summary = parse_forecast(&body).unwrap();
        assert_eq!(summary.current_temperature_c, Some(17.4));
        assert_eq!(summary.current_humidity_pct, Some(61.0));
        assert!((summary.avg_high_c - 22.0).abs() < 1e-9);
        assert!((summary.avg_low_c - 10.0).abs() < 1e-9);
        assert!((summary.weekly_precipitation_mm - 6.0).abs() < 1e-9);
        assert_eq!(summary.days, 3);
    }

    #[test]
    fn null_entries_are_skipped() {
        let body = serde_json::json!({
            "daily": {
                "temperature_2m_max": [30.0, null, 34.0],
                "temperature_2m_min": [null, 20.0],
                "precipitation_sum": [null, 2.0, null]
            }
        });
        let summary = parse_forecast(&body).unwrap();
        assert!((summary.avg_high_c - 32.0).abs() < 1e-9);
        assert!((summary.avg_low_c - 20.0).abs() < 1e-9);
        assert_eq!(summary.days, 2);
        assert_eq!(summary.current_temperature_c, None);
    }

    #[test]
    fn all_null_series_is_malformed() {
        let body = serde_json::json!({
            "daily": {
                "temperature_2m_max": [null, null],
                "temperature_2m_min": [1.0],
                "precipitation_sum": [1.0]
            }
        });
        assert!(matches!(
            parse_forecast(&body),
            Err(ClimateError::Malformed { .. })
        ));
    }

    #[test]
    fn missing_daily_is_malformed() {
        let body = serde_json::json!({ "error": true, "reason": "Latitude must be in range" });
        assert!(matches!(
            parse_forecast(&body),
            Err(ClimateError::Malformed { .. })
        ));
    }
}
