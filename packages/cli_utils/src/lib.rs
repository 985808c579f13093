#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for property-intel binaries.
//!
//! Provides an `indicatif`-backed [`PipelineObserver`] that shows one
//! spinner per resolution stage, plus [`init_logger`] which sets up
//! `indicatif-log-bridge` so that `log::info!` and friends are suspended
//! while spinners redraw.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use property_intel_profile::PipelineObserver;
use property_intel_profile_models::{PipelineStage, StageOutcome};

pub use indicatif::MultiProgress;

/// Shows a spinner for each running stage and a summary line when it ends.
pub struct IndicatifObserver {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: Mutex<BTreeMap<PipelineStage, ProgressBar>>,
}

impl IndicatifObserver {
    #[must_use]
    pub fn new(multi: &MultiProgress) -> Arc<dyn PipelineObserver> {
        Arc::new(Self {
            multi: multi.clone(),
            style: ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            bars: Mutex::new(BTreeMap::new()),
        })
    }
}

impl PipelineObserver for IndicatifObserver {
    fn stage_started(&self, stage: PipelineStage) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(self.style.clone());
        bar.set_message(format!("{stage}..."));

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(stage, bar);
        }
    }

    fn stage_finished(&self, stage: PipelineStage, outcome: StageOutcome) {
        let bar = self.bars.lock().ok().and_then(|mut bars| bars.remove(&stage));
        if let Some(bar) = bar {
            let mark = match outcome {
                StageOutcome::Completed => "ok",
                StageOutcome::Degraded => "degraded",
                StageOutcome::Failed => "FAILED",
            };
            bar.finish_with_message(format!("{stage}: {mark}"));
        }
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while spinners redraw.
///
/// Returns the [`MultiProgress`] that all spinners must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // already set in tests

    log::set_max_level(level);

    multi
}
