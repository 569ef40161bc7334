// file: src/runner/mod.rs
// description: external tool invocation module exports
// reference: Internal module structure

pub mod executor;
pub mod invocation;
pub mod locate;

pub use executor::{ExecutionOutcome, Executor, ProcessExecutor};
pub use invocation::{StdinSource, StdoutSink, ToolInvocation};
pub use locate::locate_program;
