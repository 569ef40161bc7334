// file: src/utils/validation.rs
// description: existence and shape checks for artifacts and config files
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use crate::models::{ArtifactKind, ArtifactStatus};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    /// An artifact must be a regular file; unless `allow_empty`, it must
    /// also hold at least one byte.
    pub fn validate_artifact(
        kind: ArtifactKind,
        path: &Path,
        allow_empty: bool,
    ) -> Result<ArtifactStatus> {
        let status = ArtifactStatus::probe(kind, path);

        if !status.exists {
            return Err(PipelineError::MissingArtifact {
                kind,
                path: path.to_path_buf(),
            });
        }

        if status.is_empty() && !allow_empty {
            return Err(PipelineError::MalformedArtifact {
                kind,
                path: path.to_path_buf(),
                message: "file is empty".to_string(),
            });
        }

        Ok(status)
    }

    pub fn validate_config_file(label: &str, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(PipelineError::Config(format!(
                "{} {} does not exist",
                label,
                path.display()
            )));
        }
        Ok(())
    }

    /// Taps read their config as a JSON object.
    pub fn validate_json_object(path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|e| PipelineError::file(path, e))?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;

        if !value.is_object() {
            return Err(PipelineError::Validation(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_artifact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        let kind = ArtifactKind::DiscoveredCatalog;

        assert!(matches!(
            Validator::validate_artifact(kind, &path, false),
            Err(PipelineError::MissingArtifact { .. })
        ));

        fs::write(&path, "").unwrap();
        assert!(matches!(
            Validator::validate_artifact(kind, &path, false),
            Err(PipelineError::MalformedArtifact { .. })
        ));
        assert!(Validator::validate_artifact(kind, &path, true).is_ok());

        fs::write(&path, "{}").unwrap();
        let status = Validator::validate_artifact(kind, &path, false).unwrap();
        assert_eq!(status.size_bytes, 2);
    }

    #[test]
    fn test_validate_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        assert!(Validator::validate_config_file("tap config", &path).is_err());
        fs::write(&path, "{}").unwrap();
        assert!(Validator::validate_config_file("tap config", &path).is_ok());
    }

    #[test]
    fn test_validate_json_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");

        fs::write(&path, r#"{"auth_token": "t", "email": "ops@example.com"}"#).unwrap();
        assert!(Validator::validate_json_object(&path).is_ok());

        fs::write(&path, "[1, 2]").unwrap();
        assert!(Validator::validate_json_object(&path).is_err());

        fs::write(&path, "auth_token = t").unwrap();
        assert!(matches!(
            Validator::validate_json_object(&path),
            Err(PipelineError::Serialization(_))
        ));
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());
    }
}
