// file: src/pipeline/orchestrator.rs
// description: sequences discover, select, run and transfer with artifact checks between steps
// reference: orchestrates the tap -> selector -> tap -> target handoff

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::models::{
    ArtifactKind, ArtifactSet, ArtifactStatus, CatalogSummary, MessageSummary, Step, Target,
    ToolRole,
};
use crate::pipeline::cleanup::{self, CleanReport};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::runner::{Executor, ProcessExecutor, StdoutSink, ToolInvocation};
use crate::utils::{HealthCheck, HealthReport, Validator};
use std::fs;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a step left behind, as checked before handing it on.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactInspection {
    pub status: ArtifactStatus,
    pub catalog: Option<CatalogSummary>,
    pub messages: Option<MessageSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: Step,
    pub elapsed: Duration,
    pub output: Option<ArtifactInspection>,
}

pub struct PipelineOrchestrator<E = ProcessExecutor> {
    config: Config,
    artifacts: ArtifactSet,
    executor: E,
    colored: bool,
}

impl PipelineOrchestrator<ProcessExecutor> {
    pub fn new(config: Config) -> Self {
        Self::with_executor(config, ProcessExecutor::new())
    }
}

impl<E: Executor> PipelineOrchestrator<E> {
    pub fn with_executor(config: Config, executor: E) -> Self {
        let artifacts = config.artifact_set();
        Self {
            config,
            artifacts,
            executor,
            colored: true,
        }
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub async fn run_target(&self, target: Target) -> Result<PipelineStats> {
        if target == Target::Clean {
            let report = self.clean()?;
            let mut stats = PipelineStats::new();
            stats.artifacts_removed = report.removed.len();
            return Ok(stats);
        }

        self.run_steps(&target.steps()).await
    }

    /// Runs `steps` in order and stops at the first failure.
    pub async fn run_steps(&self, steps: &[Step]) -> Result<PipelineStats> {
        if self.config.pipeline.preflight {
            self.preflight(steps)?;
        }

        let progress = if self.config.pipeline.show_progress {
            ProgressTracker::with_options(steps.len(), true, self.colored)
        } else {
            ProgressTracker::hidden(steps.len())
        };

        let mut previous: Option<Step> = None;

        for &step in steps {
            // an input this run just produced was already inspected as output
            let input_checked =
                previous.is_some_and(|p| p.output().is_some() && p.output() == step.input());

            progress.start_step(step);

            match self.execute_step(step, !input_checked).await {
                Ok(report) => {
                    if let Some(output) = &report.output {
                        progress.add_bytes_produced(output.status.size_bytes);
                        if let Some(messages) = &output.messages {
                            progress.add_records(messages.record_messages);
                        }
                    }
                    progress.complete_step(step);
                }
                Err(e) => {
                    progress.fail_step(step);
                    progress.abandon();
                    error!(step = %step, "Pipeline halted: {}", e);
                    return Err(e);
                }
            }

            previous = Some(step);
        }

        let stats = progress.get_stats();
        progress.finish();
        self.log_final_stats(&stats);

        Ok(stats)
    }

    pub async fn run_step(&self, step: Step) -> Result<StepReport> {
        self.execute_step(step, true).await
    }

    async fn execute_step(&self, step: Step, check_input: bool) -> Result<StepReport> {
        if check_input && let Some(kind) = step.input() {
            self.inspect_artifact(kind)?;
        }

        let invocation = ToolInvocation::for_step(step, &self.config);

        // a tool that writes its own output file must not be credited with a leftover one
        if let (StdoutSink::Inherit, Some(kind)) = (&invocation.stdout, step.output()) {
            self.remove_stale_output(kind)?;
        }

        info!(step = %step, "{}", invocation);

        let outcome = match self.executor.execute(&invocation).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.discard_partial_output(step);
                return Err(e);
            }
        };

        if !outcome.success {
            self.discard_partial_output(step);
            return Err(PipelineError::StepFailed {
                step,
                tool: invocation.program,
                status: outcome.describe_status(),
            });
        }

        info!(
            step = %step,
            "{} finished in {:.2}s",
            step.description(),
            outcome.elapsed.as_secs_f64()
        );

        // a malformed output from a successful tool is kept for inspection
        let output = match step.output() {
            Some(kind) => Some(self.inspect_artifact(kind)?),
            None => None,
        };

        Ok(StepReport {
            step,
            elapsed: outcome.elapsed,
            output,
        })
    }

    fn inspect_artifact(&self, kind: ArtifactKind) -> Result<ArtifactInspection> {
        let path = self.artifacts.path(kind);
        let allow_empty = kind == ArtifactKind::DataStream;
        let status = Validator::validate_artifact(kind, path, allow_empty)?;

        if status.is_empty() {
            warn!("{} at {} is empty", kind, path.display());
        }

        let mut inspection = ArtifactInspection {
            status,
            catalog: None,
            messages: None,
        };

        if !self.config.pipeline.verify_artifacts {
            return Ok(inspection);
        }

        if kind.is_catalog() {
            let catalog = CatalogSummary::from_file(kind, path)?;
            debug!(
                "{} lists {} stream(s), {} selected",
                kind,
                catalog.stream_count(),
                catalog.selected_count()
            );
            if kind == ArtifactKind::SelectedCatalog && catalog.selected_count() == 0 {
                warn!(
                    "No streams are selected in {}; the tap will extract nothing",
                    path.display()
                );
            }
            inspection.catalog = Some(catalog);
        } else {
            let messages = MessageSummary::from_file(path)?;
            debug!(
                "{} holds {} message(s), {} record(s)",
                kind,
                messages.total_messages(),
                messages.record_messages
            );
            inspection.messages = Some(messages);
        }

        Ok(inspection)
    }

    fn remove_stale_output(&self, kind: ArtifactKind) -> Result<()> {
        let path = self.artifacts.path(kind);
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Removed previous {} {}", kind, path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::file(path, e)),
        }
    }

    fn discard_partial_output(&self, step: Step) {
        let Some(kind) = step.output() else {
            return;
        };
        let path = self.artifacts.path(kind);

        if path.is_file() {
            match fs::remove_file(path) {
                Ok(()) => debug!("Removed partial {} {}", kind, path.display()),
                Err(e) => warn!("Could not remove partial {} {}: {}", kind, path.display(), e),
            }
        }
    }

    /// Fails before anything runs if a tool the steps need cannot be found
    /// or a config file they read is missing.
    pub fn preflight(&self, steps: &[Step]) -> Result<()> {
        let mut roles: Vec<ToolRole> = Vec::new();
        for step in steps {
            if !roles.contains(&step.tool()) {
                roles.push(step.tool());
            }
        }

        for role in roles {
            let program = self.config.tools.program(role);
            match self.executor.locate(program) {
                Some(path) => debug!("{} resolves to {}", role, path.display()),
                None => {
                    return Err(PipelineError::ToolNotFound {
                        tool: program.to_string(),
                    });
                }
            }
        }

        if steps.iter().any(|s| s.tool() == ToolRole::Tap) {
            Validator::validate_config_file("tap config", &self.config.tap_config_path())?;
        }

        if steps.contains(&Step::Transfer)
            && let Some(path) = self.config.target_config_path()
        {
            Validator::validate_config_file("target config", &path)?;
        }

        Ok(())
    }

    pub fn health_report(&self) -> HealthReport {
        let mut checks = Vec::new();

        for role in ToolRole::ALL {
            let program = self.config.tools.program(role);
            let component = role.to_string();
            checks.push(match self.executor.locate(program) {
                Some(path) => HealthCheck::healthy(&component, Some(path.display().to_string())),
                None => HealthCheck::unhealthy(
                    &component,
                    format!("`{}` not found on PATH", program),
                ),
            });
        }

        checks.push(config_file_check(
            "tap config",
            &self.config.tap_config_path(),
        ));
        if let Some(path) = self.config.target_config_path() {
            checks.push(config_file_check("target config", &path));
        }

        let working_dir = &self.config.artifacts.working_dir;
        checks.push(match Validator::validate_directory(working_dir) {
            Ok(()) => HealthCheck::healthy("working dir", Some(working_dir.display().to_string())),
            Err(e) => HealthCheck::degraded("working dir", format!("{}; it will be created", e)),
        });

        HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string())
    }

    pub fn artifact_status(&self) -> Vec<ArtifactStatus> {
        self.artifacts.status()
    }

    pub fn clean(&self) -> Result<CleanReport> {
        cleanup::clean(&self.artifacts)
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Pipeline Execution Summary ===");
        info!("Duration: {:.2} seconds", stats.duration_secs);
        info!("Steps completed: {}", stats.steps_completed);
        info!("Bytes produced: {}", stats.bytes_produced);
        info!("Records extracted: {}", stats.records_extracted);
        info!("Write speed: {:.0} bytes/sec", stats.bytes_per_second());
        info!("Extraction speed: {:.2} records/sec", stats.records_per_second());
        info!("==================================");
    }
}

fn config_file_check(component: &str, path: &std::path::Path) -> HealthCheck {
    if !path.is_file() {
        return HealthCheck::unhealthy(component, format!("{} does not exist", path.display()));
    }

    match Validator::validate_json_object(path) {
        Ok(()) => HealthCheck::healthy(component, Some(path.display().to_string())),
        Err(e) => HealthCheck::degraded(component, e.to_string()),
    }
}
