//! Stage event reporting.
//!
//! A [`PipelineObserver`] hears about each stage as it actually starts
//! and finishes, decoupling progress display from the pipeline.
//! Implementations must be `Send + Sync`: the demographics and climate
//! stages report from concurrently polled futures.

use std::sync::Arc;

use property_intel_profile_models::{PipelineStage, StageOutcome};

/// Receives stage events from a resolution run.
pub trait PipelineObserver: Send + Sync {
    /// A stage began.
    fn stage_started(&self, stage: PipelineStage);

    /// A stage ended.
    fn stage_finished(&self, stage: PipelineStage, outcome: StageOutcome);
}

/// Ignores every event.
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn stage_started(&self, _stage: PipelineStage) {}
    fn stage_finished(&self, _stage: PipelineStage, _outcome: StageOutcome) {}
}

/// Returns a shared [`NullObserver`].
#[must_use]
pub fn null_observer() -> Arc<dyn PipelineObserver> {
    Arc::new(NullObserver)
}
