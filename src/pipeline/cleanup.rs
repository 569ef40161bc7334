// file: src/pipeline/cleanup.rs
// description: removes the generated artifacts and nothing else
// reference: make clean

use crate::error::{PipelineError, Result};
use crate::models::{ArtifactKind, ArtifactSet};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed: Vec<(ArtifactKind, PathBuf)>,
    pub absent: Vec<(ArtifactKind, PathBuf)>,
}

/// Deletes the three artifacts. Missing files are not an error.
pub fn clean(artifacts: &ArtifactSet) -> Result<CleanReport> {
    let mut report = CleanReport::default();

    for (kind, path) in artifacts.iter() {
        match fs::remove_file(path) {
            Ok(()) => {
                info!("Removed {} {}", kind, path.display());
                report.removed.push((kind, path.to_path_buf()));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No {} at {}", kind, path.display());
                report.absent.push((kind, path.to_path_buf()));
            }
            Err(e) => return Err(PipelineError::file(path, e)),
        }
    }

    Ok(report)
}
