// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::{ArtifactSet, ToolRole};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SINGER_PIPELINE";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub tools: ToolsConfig,
    pub artifacts: ArtifactsConfig,
    pub pipeline: PipelineConfig,
}

/// External executables and the arguments they receive in addition to the
/// ones each step adds itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    pub tap: String,
    pub selector: String,
    pub target: String,
    #[serde(default)]
    pub tap_args: Vec<String>,
    #[serde(default)]
    pub selector_args: Vec<String>,
    #[serde(default)]
    pub target_args: Vec<String>,
    /// Config file handed to the tap with `--config`.
    pub tap_config: PathBuf,
    #[serde(default)]
    pub target_config: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    pub working_dir: PathBuf,
    pub catalog: PathBuf,
    pub selected_catalog: PathBuf,
    pub data: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub preflight: bool,
    pub verify_artifacts: bool,
    pub show_progress: bool,
}

impl Config {
    /// Loads built-in defaults, then the TOML file, then `SINGER_PIPELINE__*`
    /// environment variables. A missing file is only an error when `path`
    /// was given explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            tools: ToolsConfig {
                tap: "tap-precoro".to_string(),
                selector: "singer-discover".to_string(),
                target: "target-csv".to_string(),
                tap_args: vec![],
                selector_args: vec![],
                target_args: vec![],
                tap_config: PathBuf::from("config.json"),
                target_config: None,
            },
            artifacts: ArtifactsConfig {
                working_dir: PathBuf::from("."),
                catalog: PathBuf::from("catalog.json"),
                selected_catalog: PathBuf::from("catalog-selected.json"),
                data: PathBuf::from("data.txt"),
            },
            pipeline: PipelineConfig {
                preflight: true,
                verify_artifacts: true,
                show_progress: true,
            },
        }
    }

    pub fn artifact_set(&self) -> ArtifactSet {
        ArtifactSet::from_config(&self.artifacts)
    }

    pub fn tap_config_path(&self) -> PathBuf {
        self.artifacts.resolve(&self.tools.tap_config)
    }

    pub fn target_config_path(&self) -> Option<PathBuf> {
        self.tools
            .target_config
            .as_deref()
            .map(|path| self.artifacts.resolve(path))
    }

    pub fn validate(&self) -> Result<()> {
        for role in ToolRole::ALL {
            if self.tools.program(role).trim().is_empty() {
                return Err(PipelineError::Config(format!(
                    "{} program must not be empty",
                    role
                )));
            }
        }

        let artifacts = self.artifact_set();
        let paths: Vec<&Path> = artifacts.iter().map(|(_, path)| path).collect();

        for (kind, path) in artifacts.iter() {
            if path.file_name().is_none() {
                return Err(PipelineError::Config(format!(
                    "{} path {} does not name a file",
                    kind,
                    path.display()
                )));
            }
        }

        for (i, a) in paths.iter().enumerate() {
            if paths[i + 1..].contains(a) {
                return Err(PipelineError::Config(format!(
                    "artifact path {} is used more than once",
                    a.display()
                )));
            }
        }

        // clean deletes every artifact, so none may alias an input file
        let mut inputs = vec![self.tap_config_path()];
        inputs.extend(self.target_config_path());
        for input in &inputs {
            if paths.contains(&input.as_path()) {
                return Err(PipelineError::Config(format!(
                    "config file {} doubles as a generated artifact",
                    input.display()
                )));
            }
        }

        Ok(())
    }
}

impl ToolsConfig {
    pub fn program(&self, role: ToolRole) -> &str {
        match role {
            ToolRole::Tap => &self.tap,
            ToolRole::Selector => &self.selector,
            ToolRole::Target => &self.target,
        }
    }

    pub fn extra_args(&self, role: ToolRole) -> &[String] {
        match role {
            ToolRole::Tap => &self.tap_args,
            ToolRole::Selector => &self.selector_args,
            ToolRole::Target => &self.target_args,
        }
    }
}

impl ArtifactsConfig {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}
