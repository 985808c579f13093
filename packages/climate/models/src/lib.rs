#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Climate risk types.
//!
//! All scores are on a `0..=10` scale; temperatures are in °C and
//! precipitation in mm.

use property_intel_models::Tagged;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Qualitative risk level.
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
pub enum RiskLevel {
    Low,
    #[serde(rename = "Low-Moderate")]
    #[strum(serialize = "Low-Moderate")]
    LowModerate,
    Moderate,
    High,
}

impl RiskLevel {
    /// `Low` < 2, `Low-Moderate` < 4, `Moderate` < 7, `High` otherwise.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 2.0 {
            Self::Low
        } else if score < 4.0 {
            Self::LowModerate
        } else if score < 7.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }
}

/// Letter grade, `A` best.
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
pub enum RiskGrade {
    A,
    B,
    C,
    D,
}

impl RiskGrade {
    /// `A` < 4, `B` < 6, `C` < 8, `D` otherwise.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            Self::A
        } else if score < 6.0 {
            Self::B
        } else if score < 8.0 {
            Self::C
        } else {
            Self::D
        }
    }
}

/// Whether a profile was computed from live weather or substituted.
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
pub enum ClimateOrigin {
    Live,
    Estimate,
}

/// Seven-day weather digest the scores are computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub current_temperature_c: Option<f64>,
    pub current_humidity_pct: Option<f64>,
    pub current_precipitation_mm: Option<f64>,
    /// Mean of the daily maxima.
    pub avg_high_c: f64,
    /// Mean of the daily minima.
    pub avg_low_c: f64,
    /// Sum of daily precipitation over the forecast window.
    pub weekly_precipitation_mm: f64,
    /// Number of daily maxima that contributed to `avg_high_c`.
    pub days: usize,
}

/// One risk dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub score: Tagged<f64>,
    pub level: RiskLevel,
    pub description: String,
}

/// Environmental risk for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateRiskProfile {
    /// Address the profile was computed for.
    pub location: String,
    pub flood: RiskComponent,
    pub temperature: RiskComponent,
    pub precipitation: RiskComponent,
    /// Unweighted mean of the three components.
    pub overall_score: Tagged<f64>,
    pub level: RiskLevel,
    pub grade: RiskGrade,
    /// One to four adaptation recommendations.
    pub recommendations: Vec<String>,
    pub origin: ClimateOrigin,
    pub source: String,
    /// Present only for live profiles.
    pub weather: Option<WeatherSummary>,
}

impl ClimateRiskProfile {
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.origin == ClimateOrigin::Live
    }
}
