#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Property address resolution pipeline.
//!
//! ```text
//! address -> geocode -> region -> ┬ demographics ┬ -> assemble
//!                                 └ climate      ┘
//! ```
//!
//! Geocoding and region resolution are fatal on failure. Demographics and
//! climate run concurrently and degrade instead of failing; the
//! [`PropertyProfile::degradation_level`] summarises how much fallback
//! was used. Each run is independent and holds no shared mutable state.

pub mod assemble;
pub mod observer;

use std::sync::Arc;
use std::time::Duration;

use property_intel_climate::{ClimateRiskScorer, WeatherProvider};
use property_intel_demographics::{DemographicFetcher, StatisticsProvider};
use property_intel_demographics_models::{DataTier, DemographicProfile};
use property_intel_geocoder::{GeocodeError, GeocodeResolver, GeocodingProvider};
use property_intel_geography::{AdministrativeRegionResolver, CountyDirectory, RegionError};
use property_intel_profile_models::{PipelineStage, PropertyProfile, StageOutcome};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use assemble::{DemographicOutcome, assemble};
pub use observer::{NullObserver, PipelineObserver, null_observer};

/// Errors that end a run without a profile.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The address could not be geocoded.
    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// No US state could be determined.
    #[error("Region resolution failed: {0}")]
    Region(#[from] RegionError),

    /// The caller cancelled the run.
    #[error("Resolution cancelled")]
    Cancelled,

    /// The run did not finish within its deadline.
    #[error("Resolution exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),
}

/// Per-run settings.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Upper bound on the whole run. `None` relies on per-request
    /// timeouts alone.
    pub deadline: Option<Duration>,
    /// Substitute national estimates when every demographic tier fails
    /// instead of leaving demographics empty.
    pub demographic_estimates: bool,
}

/// Resolves addresses into property profiles.
#[derive(Clone)]
pub struct PropertyResolver {
    geocoder: GeocodeResolver,
    regions: AdministrativeRegionResolver,
    demographics: DemographicFetcher,
    climate: ClimateRiskScorer,
    observer: Arc<dyn PipelineObserver>,
}

impl PropertyResolver {
    /// Wires the pipeline around explicit provider clients.
    #[must_use]
    pub fn new(
        geocoding: Arc<dyn GeocodingProvider>,
        counties: Arc<dyn CountyDirectory>,
        statistics: Arc<dyn StatisticsProvider>,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            geocoder: GeocodeResolver::new(geocoding),
            regions: AdministrativeRegionResolver::new(counties),
            demographics: DemographicFetcher::new(statistics),
            climate: ClimateRiskScorer::new(weather),
            observer: null_observer(),
        }
    }

    /// Reports stage events to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Caps how long the climate stage waits for weather before
    /// substituting an estimate.
    #[must_use]
    pub fn with_climate_time_budget(mut self, time_budget: Duration) -> Self {
        self.climate = self.climate.with_time_budget(time_budget);
        self
    }

    /// Resolves with default options and no external cancellation.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_with`].
    pub async fn resolve(&self, address: &str) -> Result<PropertyProfile, PipelineError> {
        self.resolve_with(address, &PipelineOptions::default(), &CancellationToken::new())
            .await
    }

    /// Resolves an address.
    ///
    /// Cancelling `cancel` or hitting `options.deadline` drops every
    /// in-flight provider request and discards partial results.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Geocode`] or [`PipelineError::Region`]
    /// when a fatal stage fails, [`PipelineError::Cancelled`] when
    /// `cancel` fires, and [`PipelineError::DeadlineExceeded`] when the
    /// deadline passes.
    pub async fn resolve_with(
        &self,
        address: &str,
        options: &PipelineOptions,
        cancel: &CancellationToken,
    ) -> Result<PropertyProfile, PipelineError> {
        let bounded = async {
            match options.deadline {
                Some(deadline) => tokio::time::timeout(deadline, self.run(address, options))
                    .await
                    .unwrap_or(Err(PipelineError::DeadlineExceeded(deadline))),
                None => self.run(address, options).await,
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                log::warn!("Resolution of '{address}' cancelled");
                Err(PipelineError::Cancelled)
            }
            result = bounded => {
                if let Err(PipelineError::DeadlineExceeded(deadline)) = &result {
                    log::warn!("Resolution of '{address}' exceeded {deadline:?}");
                }
                result
            }
        }
    }

    async fn run(
        &self,
        address: &str,
        options: &PipelineOptions,
    ) -> Result<PropertyProfile, PipelineError> {
        self.observer.stage_started(PipelineStage::Geocode);
        let geocode = self
            .geocoder
            .resolve(address)
            .await
            .inspect_err(|_| self.finish(PipelineStage::Geocode, StageOutcome::Failed))?;
        self.finish(PipelineStage::Geocode, StageOutcome::Completed);

        self.observer.stage_started(PipelineStage::Region);
        let region = self
            .regions
            .resolve(&geocode)
            .await
            .inspect_err(|_| self.finish(PipelineStage::Region, StageOutcome::Failed))?;
        self.finish(
            PipelineStage::Region,
            if region.resolved_county_fips().is_some() {
                StageOutcome::Completed
            } else {
                StageOutcome::Degraded
            },
        );

        let demographics = async {
            self.observer.stage_started(PipelineStage::Demographics);
            let outcome = match self.demographics.fetch(address, &region).await {
                Ok(profile) => DemographicOutcome::Fetched(profile),
                Err(cause) if options.demographic_estimates => {
                    log::warn!("Using national demographic estimates for '{address}': {cause}");
                    DemographicOutcome::Estimated {
                        profile: DemographicProfile::national_estimate(),
                        cause,
                    }
                }
                Err(e) => DemographicOutcome::Failed(e),
            };
            self.finish(PipelineStage::Demographics, demographic_stage_outcome(&outcome));
            outcome
        };

        let climate = async {
            self.observer.stage_started(PipelineStage::Climate);
            let profile = self
                .climate
                .score(geocode.latitude, geocode.longitude, &geocode.formatted_address)
                .await;
            self.finish(
                PipelineStage::Climate,
                if profile.is_live() {
                    StageOutcome::Completed
                } else {
                    StageOutcome::Degraded
                },
            );
            profile
        };

        let (demographics, climate) = tokio::join!(demographics, climate);

        self.observer.stage_started(PipelineStage::Assemble);
        let profile = assemble(geocode, region, demographics, climate);
        self.finish(PipelineStage::Assemble, StageOutcome::Completed);

        Ok(profile)
    }

    fn finish(&self, stage: PipelineStage, outcome: StageOutcome) {
        log::debug!("Stage {stage}: {outcome}");
        self.observer.stage_finished(stage, outcome);
    }
}

const fn demographic_stage_outcome(outcome: &DemographicOutcome) -> StageOutcome {
    match outcome {
        DemographicOutcome::Fetched(profile) if matches!(profile.data_tier, DataTier::County) => {
            StageOutcome::Completed
        }
        DemographicOutcome::Fetched(_) | DemographicOutcome::Estimated { .. } => {
            StageOutcome::Degraded
        }
        DemographicOutcome::Failed(_) => StageOutcome::Failed,
    }
}
