#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate risk scoring.
//!
//! [`ClimateRiskScorer::score`] never fails. With live weather it scores
//! flood, temperature, and precipitation risk from the forecast and the
//! coordinates; when the weather provider fails or exceeds its time
//! budget it returns [`ClimateRiskScorer::estimate`], a clearly labelled
//! moderate profile.

pub mod open_meteo;
pub mod scoring;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use property_intel_climate_models::{
    ClimateOrigin, ClimateRiskProfile, RiskComponent, RiskGrade, RiskLevel, WeatherSummary,
};
use property_intel_models::Tagged;
use property_intel_provider::ProviderError;
use property_intel_provider::http::DEFAULT_TIMEOUT;
use thiserror::Error;

/// Source label of live profiles.
pub const LIVE_SOURCE: &str = "Open-Meteo forecast";
/// Source label of substituted profiles.
pub const ESTIMATE_SOURCE: &str = "estimate (provider unavailable)";
/// Score used for every component of a substituted profile.
pub const ESTIMATE_SCORE: f64 = 5.0;
/// Band the substituted overall score is guaranteed to fall in.
pub const ESTIMATE_BAND: std::ops::Range<f64> = 4.0..7.0;

/// Errors from the weather provider.
#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The response was JSON but not a usable forecast.
    #[error("Malformed weather response: {message}")]
    Malformed {
        /// Description of the problem.
        message: String,
    },

    /// The provider did not answer within the scorer's time budget.
    #[error("Weather provider did not answer within {0:?}")]
    TimedOut(Duration),
}

impl ClimateError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// A weather forecast backend.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetches current conditions and the daily forecast.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError`] if the request fails or the response
    /// cannot be used.
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSummary, ClimateError>;
}

/// Scores climate risk, degrading to an estimate on provider failure.
#[derive(Clone)]
pub struct ClimateRiskScorer {
    provider: Arc<dyn WeatherProvider>,
    time_budget: Duration,
}

impl ClimateRiskScorer {
    #[must_use]
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            time_budget: DEFAULT_TIMEOUT,
        }
    }

    /// Caps how long [`Self::score`] waits for the provider.
    #[must_use]
    pub const fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Scores a location. Never fails.
    pub async fn score(&self, latitude: f64, longitude: f64, address: &str) -> ClimateRiskProfile {
        let fetched = tokio::time::timeout(
            self.time_budget,
            self.provider.fetch_weather(latitude, longitude),
        )
        .await
        .unwrap_or(Err(ClimateError::TimedOut(self.time_budget)));

        match fetched {
            Ok(weather) => {
                let profile = Self::from_weather(latitude, longitude, address, weather);
                log::info!(
                    "Climate risk for '{address}': {} ({}, grade {})",
                    profile.overall_score.value,
                    profile.level,
                    profile.grade
                );
                profile
            }
            Err(e) => {
                log::warn!("Weather for '{address}' unavailable, using estimate: {e}");
                Self::estimate(address)
            }
        }
    }

    /// Scores a location from an already-fetched forecast.
    #[must_use]
    pub fn from_weather(
        latitude: f64,
        longitude: f64,
        address: &str,
        weather: WeatherSummary,
    ) -> ClimateRiskProfile {
        let flood = scoring::flood_score(latitude, longitude);
        let temperature = scoring::temperature_score(weather.avg_high_c, weather.avg_low_c);
        let precipitation = scoring::precipitation_score(weather.weekly_precipitation_mm);
        let overall = scoring::overall_score(flood, temperature, precipitation);

        ClimateRiskProfile {
            location: address.to_string(),
            flood: live_component(flood, scoring::flood_description(flood)),
            temperature: live_component(
                temperature,
                scoring::temperature_description(temperature),
            ),
            precipitation: live_component(
                precipitation,
                scoring::precipitation_description(precipitation),
            ),
            overall_score: Tagged::derived(overall),
            level: RiskLevel::from_score(overall),
            grade: RiskGrade::from_score(overall),
            recommendations: scoring::recommendations(overall),
            origin: ClimateOrigin::Live,
            source: LIVE_SOURCE.to_string(),
            weather: Some(weather),
        }
    }

    /// The conservative profile used when no weather is available.
    #[must_use]
    pub fn estimate(address: &str) -> ClimateRiskProfile {
        let component = || RiskComponent {
            score: Tagged::estimated(ESTIMATE_SCORE),
            level: RiskLevel::from_score(ESTIMATE_SCORE),
            description: "Conservative estimate; weather provider unavailable.".to_string(),
        };

        ClimateRiskProfile {
            location: address.to_string(),
            flood: component(),
            temperature: component(),
            precipitation: component(),
            overall_score: Tagged::estimated(ESTIMATE_SCORE),
            level: RiskLevel::from_score(ESTIMATE_SCORE),
            grade: RiskGrade::from_score(ESTIMATE_SCORE),
            recommendations: scoring::recommendations(ESTIMATE_SCORE),
            origin: ClimateOrigin::Estimate,
            source: ESTIMATE_SOURCE.to_string(),
            weather: None,
        }
    }
}

fn live_component(score: f64, description: &str) -> RiskComponent {
    RiskComponent {
        score: Tagged::derived(score),
        level: RiskLevel::from_score(score),
        description: description.to_string(),
    }
}
