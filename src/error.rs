// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use crate::models::{ArtifactKind, Step};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool `{tool}` not found; is it installed and on PATH?")]
    ToolNotFound { tool: String },

    #[error("Failed to spawn `{tool}`: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },

    #[error("Step {step} failed: `{tool}` exited with {status}")]
    StepFailed {
        step: Step,
        tool: String,
        status: String,
    },

    #[error("{kind} is missing at {path}; run the producing step first")]
    MissingArtifact { kind: ArtifactKind, path: PathBuf },

    #[error("{kind} at {path} is malformed: {message}")]
    MalformedArtifact {
        kind: ArtifactKind,
        path: PathBuf,
        message: String,
    },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            path: path.into(),
            source,
        }
    }
}
