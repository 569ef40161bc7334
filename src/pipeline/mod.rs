// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod cleanup;
mod orchestrator;
mod progress;

pub use cleanup::{CleanReport, clean};
pub use orchestrator::{ArtifactInspection, PipelineOrchestrator, StepReport};
pub use progress::{PipelineStats, ProgressTracker};
