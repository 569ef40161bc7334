// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use singer_pipeline::utils::logging::{
    format_error, format_info, format_step, format_success, format_warning,
};
use singer_pipeline::config::DEFAULT_CONFIG_PATH;
use singer_pipeline::{Config, PipelineOrchestrator, Step, Target};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "singer_pipeline")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(
    about = "Runs a Singer tap, catalog selector and CSV target as a file-chained pipeline",
    long_about = None
)]
struct Cli {
    /// Pipeline config; `config/default.toml` is used when present
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Config file handed to the tap with --config
    #[arg(long, value_name = "FILE", env = "TAP_CONFIG")]
    tap_config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    no_progress: bool,

    #[arg(long, action = ArgAction::SetTrue)]
    skip_preflight: bool,

    /// Defaults to `all`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run discover, select, run and transfer in order
    All,

    /// Write the tap's discovered catalog
    Discover,

    /// Pick streams from the discovered catalog
    Select,

    /// Extract records with the selected catalog
    Run,

    /// Stream extracted records into the target
    Transfer,

    /// Delete the generated catalog, selected catalog and data files
    Clean,

    /// Show which artifacts exist
    Status {
        #[arg(long)]
        json: bool,
    },

    /// Verify tools and config files are in place
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    singer_pipeline::utils::logging::init_logger(cli.color, cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    if let Some(tap_config) = cli.tap_config {
        config.tools.tap_config = tap_config;
        config.validate().context("Invalid --tap-config")?;
    }
    if cli.no_progress {
        config.pipeline.show_progress = false;
    }
    if cli.skip_preflight {
        config.pipeline.preflight = false;
    }

    let orchestrator = PipelineOrchestrator::new(config).colored(cli.color);

    match cli.command.unwrap_or(Commands::All) {
        Commands::All => cmd_steps(&orchestrator, Target::All).await?,
        Commands::Discover => cmd_steps(&orchestrator, Step::Discover.into()).await?,
        Commands::Select => cmd_steps(&orchestrator, Step::Select.into()).await?,
        Commands::Run => cmd_steps(&orchestrator, Step::Run.into()).await?,
        Commands::Transfer => cmd_steps(&orchestrator, Step::Transfer.into()).await?,
        Commands::Clean => cmd_clean(&orchestrator)?,
        Commands::Status { json } => cmd_status(&orchestrator, json)?,
        Commands::Check => cmd_check(&orchestrator)?,
    }

    Ok(())
}

/// A config file named on the command line must exist. Without one the
/// bundled default is used when present, else the built-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.is_file() {
            anyhow::bail!("Config file {} does not exist", path.display());
        }
        info!("Loading configuration from: {}", path.display());
        return Config::load(Some(path)).context("Failed to load configuration");
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.is_file() {
        info!("Loading configuration from: {}", default_path.display());
    } else {
        warn!(
            "{} not found, using built-in defaults",
            default_path.display()
        );
    }
    Config::load(None).context("Failed to load configuration")
}

async fn cmd_steps(orchestrator: &PipelineOrchestrator, target: Target) -> Result<()> {
    let steps = target.steps();
    for step in &steps {
        eprintln!(
            "{}",
            format_step(step.position(), Step::ALL.len(), step.description())
        );
    }

    match orchestrator.run_target(target).await {
        Ok(stats) => {
            let mut summary = format!(
                "{} step(s) finished in {:.2}s",
                stats.steps_completed, stats.duration_secs
            );
            if steps.contains(&Step::Run) {
                summary.push_str(&format!(", {} record(s) extracted", stats.records_extracted));
            }
            eprintln!("{}", format_success(&summary));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            Err(e).context("Pipeline failed")
        }
    }
}

fn cmd_clean(orchestrator: &PipelineOrchestrator) -> Result<()> {
    let report = orchestrator.clean().context("Cleanup failed")?;

    for (kind, path) in &report.removed {
        eprintln!(
            "{}",
            format_success(&format!("Removed {} {}", kind, path.display()))
        );
    }
    if report.removed.is_empty() {
        eprintln!("{}", format_info("Nothing to clean"));
    }

    Ok(())
}

fn cmd_status(orchestrator: &PipelineOrchestrator, json: bool) -> Result<()> {
    let statuses = orchestrator.artifact_status();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        let label = format!("{:<20} {}", status.kind.to_string(), status.path.display());
        if status.exists {
            println!("{}", format_success(&format!("{} ({} bytes)", label, status.size_bytes)));
        } else {
            println!("{}", format_warning(&format!("{} (missing)", label)));
        }
    }

    Ok(())
}

fn cmd_check(orchestrator: &PipelineOrchestrator) -> Result<()> {
    let report = orchestrator.health_report();
    println!("{}", report.format());

    if !report.is_healthy() {
        return Err(anyhow::anyhow!("Pipeline is not ready to run"));
    }

    Ok(())
}
