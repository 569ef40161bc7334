// file: src/runner/invocation.rs
// description: command lines and stdio wiring for each pipeline step
// reference: tap --discover / singer-discover / tap --catalog / target < data

use crate::config::Config;
use crate::models::Step;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdinSource {
    Inherit,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdoutSink {
    Inherit,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub step: Step,
    pub program: String,
    pub args: Vec<String>,
    pub stdin: StdinSource,
    pub stdout: StdoutSink,
}

impl ToolInvocation {
    pub fn for_step(step: Step, config: &Config) -> Self {
        let artifacts = config.artifact_set();
        let role = step.tool();
        let mut args: Vec<String> = config.tools.extra_args(role).to_vec();
        let mut stdin = StdinSource::Inherit;
        let mut stdout = StdoutSink::Inherit;

        match step {
            Step::Discover => {
                args.push("--config".to_string());
                args.push(path_arg(config.tap_config_path()));
                args.push("--discover".to_string());
                stdout = StdoutSink::File(artifacts.catalog);
            }
            Step::Select => {
                args.push("--input".to_string());
                args.push(path_arg(artifacts.catalog));
                args.push("--output".to_string());
                args.push(path_arg(artifacts.selected_catalog));
            }
            Step::Run => {
                args.push("--config".to_string());
                args.push(path_arg(config.tap_config_path()));
                args.push("--catalog".to_string());
                args.push(path_arg(artifacts.selected_catalog));
                stdout = StdoutSink::File(artifacts.data);
            }
            Step::Transfer => {
                if let Some(target_config) = config.target_config_path() {
                    args.push("--config".to_string());
                    args.push(path_arg(target_config));
                }
                stdin = StdinSource::File(artifacts.data);
            }
        }

        Self {
            step,
            program: config.tools.program(role).to_string(),
            args,
            stdin,
            stdout,
        }
    }

    /// Path of the file the step writes itself, or that its stdout is
    /// redirected into.
    pub fn output_path(&self, config: &Config) -> Option<PathBuf> {
        self.step
            .output()
            .map(|kind| config.artifact_set().path(kind).to_path_buf())
    }
}

fn path_arg(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

/// Renders the invocation the way a shell recipe would read.
impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let StdinSource::File(path) = &self.stdin {
            write!(f, " < {}", path.display())?;
        }
        if let StdoutSink::File(path) = &self.stdout {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}
