// file: src/runner/executor.rs
// description: runs a tool invocation as a blocking child process
// reference: https://docs.rs/tokio/latest/tokio/process

use crate::error::{PipelineError, Result};
use crate::runner::invocation::{StdinSource, StdoutSink, ToolInvocation};
use crate::runner::locate::locate_program;
use std::fs::{self, File};
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    pub fn succeeded(elapsed: Duration) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            elapsed,
        }
    }

    pub fn failed(exit_code: Option<i32>, elapsed: Duration) -> Self {
        Self {
            success: false,
            exit_code,
            elapsed,
        }
    }

    pub fn describe_status(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "a signal".to_string(),
        }
    }
}

pub trait Executor {
    fn execute(
        &self,
        invocation: &ToolInvocation,
    ) -> impl Future<Output = Result<ExecutionOutcome>> + Send;

    fn locate(&self, program: &str) -> Option<PathBuf> {
        locate_program(program)
    }
}

/// Spawns real processes. Stderr is always inherited so tool diagnostics,
/// and interactive prompts from the selector, reach the terminal.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn build_command(invocation: &ToolInvocation) -> Result<Command> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        match &invocation.stdin {
            StdinSource::Inherit => {
                command.stdin(Stdio::inherit());
            }
            StdinSource::File(path) => {
                let file = File::open(path).map_err(|e| PipelineError::file(path, e))?;
                command.stdin(Stdio::from(file));
            }
        }

        match &invocation.stdout {
            StdoutSink::Inherit => {
                command.stdout(Stdio::inherit());
            }
            StdoutSink::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).map_err(|e| PipelineError::file(parent, e))?;
                }
                let file = File::create(path).map_err(|e| PipelineError::file(path, e))?;
                command.stdout(Stdio::from(file));
            }
        }

        Ok(command)
    }
}

impl Executor for ProcessExecutor {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<ExecutionOutcome> {
        let mut command = Self::build_command(invocation)?;

        debug!(program = %invocation.program, args = ?invocation.args, "spawning tool");
        let started = Instant::now();

        let status = command.status().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PipelineError::ToolNotFound {
                tool: invocation.program.clone(),
            },
            _ => PipelineError::Spawn {
                tool: invocation.program.clone(),
                source: e,
            },
        })?;

        let elapsed = started.elapsed();
        debug!(program = %invocation.program, ?status, "tool exited");

        if status.success() {
            Ok(ExecutionOutcome::succeeded(elapsed))
        } else {
            Ok(ExecutionOutcome::failed(status.code(), elapsed))
        }
    }
}
