#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared provenance taxonomy for property profile data.
//!
//! Every numeric or identifying field that ends up in a property profile
//! is wrapped in a [`Tagged`] value so that it carries exactly one
//! [`Provenance`] label describing how directly it came from an upstream
//! provider.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How directly a value came from an upstream provider.
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
pub enum Provenance {
    /// Returned as-is by a provider.
    Verified,
    /// Computed from verified provider values (ratios, rules of thumb,
    /// heuristics over provider output).
    Derived,
    /// Substituted because the provider was unavailable.
    Estimated,
}

/// A value paired with its single provenance tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tagged<T> {
    /// The value itself.
    pub value: T,
    /// Where the value came from.
    pub provenance: Provenance,
}

impl<T> Tagged<T> {
    /// Wraps a value returned directly by a provider.
    #[must_use]
    pub const fn verified(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Verified,
        }
    }

    /// Wraps a value computed from provider data.
    #[must_use]
    pub const fn derived(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Derived,
        }
    }

    /// Wraps a substituted value.
    #[must_use]
    pub const fn estimated(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Estimated,
        }
    }

    /// Transforms the value while keeping its provenance.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tagged<U> {
        Tagged {
            value: f(self.value),
            provenance: self.provenance,
        }
    }
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamps a percentage into `[0, 100]`. `NaN` becomes `0`.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Clamps a risk score into `[0, 10]`. `NaN` becomes `0`.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 10.0)
}
