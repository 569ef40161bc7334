// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod runner;
pub mod utils;

pub use config::{ArtifactsConfig, Config, PipelineConfig, ToolsConfig};
pub use error::{PipelineError, Result};
pub use models::{
    ArtifactKind, ArtifactSet, ArtifactStatus, CatalogSummary, MessageSummary, Step, Target,
    ToolRole,
};
pub use pipeline::{CleanReport, PipelineOrchestrator, PipelineStats, ProgressTracker, StepReport};
pub use runner::{ExecutionOutcome, Executor, ProcessExecutor, ToolInvocation};
pub use utils::{HealthCheck, HealthReport, HealthStatus, Validator};
