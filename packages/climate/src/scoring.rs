//! Component scoring rules.
//!
//! Every function returns a score already clamped to `[0, 10]` and
//! rounded to one decimal, so no input, however extreme, escapes the
//! scale.

use property_intel_models::{clamp_score, round1};

/// Moderate daily temperature band, °C.
pub const MODERATE_TEMPERATURE_C: (f64, f64) = (10.0, 30.0);
/// Daily lows below this or highs above this are extreme, °C.
pub const EXTREME_TEMPERATURE_C: (f64, f64) = (0.0, 35.0);
/// Moderate weekly precipitation, mm.
pub const MODERATE_WEEKLY_PRECIPITATION_MM: (f64, f64) = (5.0, 30.0);

/// Score reached at the extreme thresholds.
const EXTREME_SCORE: f64 = 8.0;
/// Added for general coastal proximity.
const COASTAL_BONUS: f64 = 1.0;

/// Coarse geographic flood heuristic.
///
/// | band                              | score |
/// |-----------------------------------|-------|
/// | latitude 25-30 (Gulf, Florida)    | 4.5   |
/// | within 2° of New York City        | 3.5   |
/// | latitude above 45                 | 1.5   |
/// | elsewhere                         | 2.5   |
///
/// plus [`COASTAL_BONUS`] inside the rough Gulf, Atlantic, and Pacific
/// coastal boxes.
#[must_use]
pub fn flood_score(latitude: f64, longitude: f64) -> f64 {
    let band = if latitude > 25.0 && latitude < 30.0 {
        4.5
    } else if (latitude - 40.7).abs() < 2.0 && (longitude + 74.0).abs() < 2.0 {
        3.5
    } else if latitude > 45.0 {
        1.5
    } else {
        2.5
    };
    let bonus = if is_coastal(latitude, longitude) {
        COASTAL_BONUS
    } else {
        0.0
    };
    round1(clamp_score(band + bonus))
}

fn is_coastal(latitude: f64, longitude: f64) -> bool {
    let gulf = (25.0..=31.0).contains(&latitude) && (-98.0..=-80.0).contains(&longitude);
    let atlantic = (32.0..=45.0).contains(&latitude) && longitude > -77.0 && longitude < -66.0;
    let pacific = ((37.0..=49.0).contains(&latitude) && longitude < -122.0)
        || ((32.0..37.0).contains(&latitude) && longitude < -117.0);
    gulf || atlantic || pacific
}

/// How far one daily temperature sits outside the moderate band.
///
/// Zero inside the band, rising linearly to [`EXTREME_SCORE`] at the
/// extreme threshold, then half a point per degree beyond it.
fn temperature_departure(celsius: f64) -> f64 {
    let (low, high) = MODERATE_TEMPERATURE_C;
    let (extreme_low, extreme_high) = EXTREME_TEMPERATURE_C;

    if celsius > high {
        if celsius <= extreme_high {
            (celsius - high) / (extreme_high - high) * EXTREME_SCORE
        } else {
            EXTREME_SCORE + (celsius - extreme_high) * 0.5
        }
    } else if celsius < low {
        if celsius >= extreme_low {
            (low - celsius) / (low - extreme_low) * EXTREME_SCORE
        } else {
            EXTREME_SCORE + (extreme_low - celsius) * 0.5
        }
    } else {
        0.0
    }
}

/// Worse of the average-high and average-low departures.
#[must_use]
pub fn temperature_score(avg_high_c: f64, avg_low_c: f64) -> f64 {
    let score = temperature_departure(avg_high_c).max(temperature_departure(avg_low_c));
    round1(clamp_score(score))
}

/// Scores deviation of the weekly total from the moderate range in both
/// directions: drought below it, flooding above it.
#[must_use]
pub fn precipitation_score(weekly_total_mm: f64) -> f64 {
    let (dry, wet) = MODERATE_WEEKLY_PRECIPITATION_MM;
    let total = weekly_total_mm.max(0.0);

    let score = if total < dry {
        (dry - total) / dry * 6.0
    } else if total <= wet {
        0.0
    } else if total <= wet * 2.0 {
        (total - wet) / wet * EXTREME_SCORE
    } else {
        EXTREME_SCORE + (total - wet * 2.0) * 0.05
    };
    round1(clamp_score(score))
}

/// Unweighted mean of the components.
#[must_use]
pub fn overall_score(flood: f64, temperature: f64, precipitation: f64) -> f64 {
    round1(clamp_score((flood + temperature + precipitation) / 3.0))
}

#[must_use]
pub const fn flood_description(score: f64) -> &'static str {
    if score >= 5.0 {
        "High flood risk area. Consider flood insurance and elevation."
    } else if score >= 3.0 {
        "Moderate flood risk. Monitor local flood zones and drainage."
    } else {
        "Low flood risk. Standard precautions sufficient."
    }
}

#[must_use]
pub const fn temperature_description(score: f64) -> &'static str {
    if score >= 4.0 {
        "Extreme temperature variations. Higher HVAC costs expected."
    } else if score >= 2.0 {
        "Moderate temperature ranges. Standard climate control needs."
    } else {
        "Mild climate conditions. Energy efficient location."
    }
}

#[must_use]
pub const fn precipitation_description(score: f64) -> &'static str {
    if score >= 4.0 {
        "Extreme precipitation patterns. Enhanced drainage recommended."
    } else if score >= 2.0 {
        "Variable precipitation. Standard water management sufficient."
    } else {
        "Stable precipitation patterns. Low water-related risks."
    }
}

/// One to four recommendations, more as the overall score rises.
#[must_use]
pub fn recommendations(overall: f64) -> Vec<String> {
    let picked: &[&str] = if overall >= 7.0 {
        &[
            "Consider climate-resilient building materials",
            "Install comprehensive drainage systems",
            "Invest in efficient HVAC systems",
            "Review insurance coverage for climate risks",
        ]
    } else if overall >= 4.0 {
        &[
            "Monitor local climate trends",
            "Ensure adequate drainage",
            "Consider energy-efficient upgrades",
        ]
    } else if overall >= 2.0 {
        &[
            "Location has favorable climate conditions",
            "Monitor long-term climate trends",
        ]
    } else {
        &["Location has favorable climate conditions"]
    };
    picked.iter().map(|s| (*s).to_string()).collect()
}
