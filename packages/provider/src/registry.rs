//! Compile-time registry of upstream provider configurations.
//!
//! Each provider is defined in a TOML file under `services/`. The
//! registry embeds these at compile time and exposes them via
//! [`all_services`], [`enabled_services`], and [`enabled_of_kind`].
//! API keys never live in the TOML; each keyed provider names the
//! environment variable that holds its key.

use serde::Deserialize;
use strum_macros::{AsRefStr, Display};

use crate::ProviderError;

/// What a provider is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceKind {
    /// Address to coordinates.
    Geocoding,
    /// Demographic and economic aggregates.
    Statistics,
    /// Current conditions and forecasts.
    Weather,
    /// Nearby amenities. Not used by the resolution pipeline.
    Places,
}

/// A provider configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderService {
    /// Unique identifier (e.g., `"google"`, `"census"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// What the provider is used for.
    pub kind: ServiceKind,
    /// Whether this service may be selected.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Selection order within a kind. Lower values win.
    pub priority: u32,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Google Geocoding API.
    Google {
        /// API base URL (e.g., `"https://maps.googleapis.com/maps/api"`).
        base_url: String,
        /// Environment variable holding the API key.
        key_env: String,
    },
    /// Nominatim / `OpenStreetMap` free-form search.
    Nominatim {
        /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
        base_url: String,
    },
    /// US Census Bureau American Community Survey API.
    CensusAcs {
        /// API base URL (e.g., `"https://api.census.gov/data"`).
        base_url: String,
        /// Dataset path (e.g., `"2022/acs/acs5"`).
        dataset: String,
        /// Environment variable holding the API key.
        key_env: String,
    },
    /// Open-Meteo forecast API.
    OpenMeteo {
        /// API base URL (e.g., `"https://api.open-meteo.com/v1"`).
        base_url: String,
        /// Number of forecast days to request.
        #[serde(default = "default_forecast_days")]
        forecast_days: u8,
    },
    /// Google Places nearby search.
    GooglePlaces {
        /// API base URL.
        base_url: String,
        /// Environment variable holding the API key.
        key_env: String,
    },
}

const fn default_true() -> bool {
    true
}

const fn default_forecast_days() -> u8 {
    7
}

impl ProviderService {
    /// Returns the provider's base URL regardless of variant.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Google { base_url, .. }
            | ProviderConfig::Nominatim { base_url }
            | ProviderConfig::CensusAcs { base_url, .. }
            | ProviderConfig::OpenMeteo { base_url, .. }
            | ProviderConfig::GooglePlaces { base_url, .. } => base_url,
        }
    }

    /// Returns the environment variable holding this provider's key, if
    /// it needs one.
    #[must_use]
    pub fn key_env(&self) -> Option<&str> {
        match &self.provider {
            ProviderConfig::Google { key_env, .. }
            | ProviderConfig::CensusAcs { key_env, .. }
            | ProviderConfig::GooglePlaces { key_env, .. } => Some(key_env),
            ProviderConfig::Nominatim { .. } | ProviderConfig::OpenMeteo { .. } => None,
        }
    }

    /// Reads this provider's API key from the environment.
    ///
    /// Returns `None` for keyless providers and for unset or blank keys.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        let var = self.key_env()?;
        std::env::var(var).ok().filter(|k| !k.trim().is_empty())
    }

    /// Whether the provider can be called with the current environment.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.key_env().is_none() || self.api_key().is_some()
    }

    /// Like [`Self::api_key`] but fails for keyed providers without a key.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingCredentials`] when the provider
    /// needs a key and none is configured.
    pub fn require_api_key(&self) -> Result<Option<String>, ProviderError> {
        match (self.key_env(), self.api_key()) {
            (None, _) => Ok(None),
            (Some(_), Some(key)) => Ok(Some(key)),
            (Some(var), None) => Err(ProviderError::MissingCredentials {
                service: self.id.clone(),
                env_var: var.to_string(),
            }),
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("google", include_str!("../services/google.toml")),
    ("nominatim", include_str!("../services/nominatim.toml")),
    ("census", include_str!("../services/census.toml")),
    ("open_meteo", include_str!("../services/open_meteo.toml")),
    ("google_places", include_str!("../services/google_places.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 5;

/// Returns all provider configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<ProviderService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse provider service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, sorted by priority (ascending).
#[must_use]
pub fn enabled_services() -> Vec<ProviderService> {
    let mut services: Vec<ProviderService> =
        all_services().into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    services
}

/// Returns enabled services of one kind, sorted by priority.
#[must_use]
pub fn enabled_of_kind(kind: ServiceKind) -> Vec<ProviderService> {
    enabled_services()
        .into_iter()
        .filter(|s| s.kind == kind)
        .collect()
}

/// Looks up a service by id.
#[must_use]
pub fn service(id: &str) -> Option<ProviderService> {
    all_services().into_iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn loads_all_services() {
        assert_eq!(all_services().len(), EXPECTED_SERVICE_COUNT);
    }

    #[test]
    fn service_ids_are_unique() {
        let mut seen = BTreeSet::new();
        for svc in &all_services() {
            assert!(seen.insert(svc.id.clone()), "Duplicate service ID: {}", svc.id);
        }
    }

    #[test]
    fn all_services_have_required_fields() {
        for svc in &all_services() {
            assert!(!svc.id.is_empty(), "Service has empty id");
            assert!(!svc.name.is_empty(), "Service {} has empty name", svc.id);
            assert!(
                svc.base_url().starts_with("https://"),
                "Service {} has a non-https base_url",
                svc.id
            );
        }
    }

    #[test]
    fn enabled_services_sorted_by_priority() {
        let services = enabled_services();
        for window in services.windows(2) {
            assert!(window[0].priority <= window[1].priority);
        }
    }

    #[test]
    fn places_provider_is_disabled() {
        assert!(enabled_of_kind(ServiceKind::Places).is_empty());
        assert!(service("google_places").is_some_and(|s| !s.enabled));
    }

    #[test]
    fn geocoders_ordered_google_then_nominatim() {
        let ids: Vec<String> = enabled_of_kind(ServiceKind::Geocoding)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["google", "nominatim"]);
    }

    #[test]
    fn keyless_providers_always_have_credentials() {
        let nominatim = service("nominatim").unwrap();
        assert!(nominatim.key_env().is_none());
        assert!(nominatim.has_credentials());
        assert!(nominatim.require_api_key().unwrap().is_none());
    }

    #[test]
    fn census_dataset_is_acs5() {
        let census = service("census").unwrap();
        assert!(matches!(
            census.provider,
            ProviderConfig::CensusAcs { ref dataset, .. } if dataset == "2022/acs/acs5"
        ));
        assert_eq!(census.key_env(), Some("CENSUS_API_KEY"));
    }
}
