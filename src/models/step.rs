// file: src/models/step.rs
// description: pipeline steps, their artifact contracts and runnable targets
// reference: discover -> select -> run -> transfer

use crate::models::ArtifactKind;
use serde::Serialize;
use std::fmt;

/// Which configured executable a step invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolRole {
    Tap,
    Selector,
    Target,
}

impl ToolRole {
    pub const ALL: [ToolRole; 3] = [ToolRole::Tap, ToolRole::Selector, ToolRole::Target];
}

impl fmt::Display for ToolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tap => "tap",
            Self::Selector => "catalog selector",
            Self::Target => "target",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Discover,
    Select,
    Run,
    Transfer,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Discover, Step::Select, Step::Run, Step::Transfer];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Select => "select",
            Self::Run => "run",
            Self::Transfer => "transfer",
        }
    }

    /// 1-based position in the full pipeline.
    pub fn position(&self) -> usize {
        *self as usize + 1
    }

    pub fn input(&self) -> Option<ArtifactKind> {
        match self {
            Self::Discover => None,
            Self::Select => Some(ArtifactKind::DiscoveredCatalog),
            Self::Run => Some(ArtifactKind::SelectedCatalog),
            Self::Transfer => Some(ArtifactKind::DataStream),
        }
    }

    /// Artifact written by the step; transfer only feeds the target.
    pub fn output(&self) -> Option<ArtifactKind> {
        match self {
            Self::Discover => Some(ArtifactKind::DiscoveredCatalog),
            Self::Select => Some(ArtifactKind::SelectedCatalog),
            Self::Run => Some(ArtifactKind::DataStream),
            Self::Transfer => None,
        }
    }

    pub fn tool(&self) -> ToolRole {
        match self {
            Self::Discover | Self::Run => ToolRole::Tap,
            Self::Select => ToolRole::Selector,
            Self::Transfer => ToolRole::Target,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Discover => "Discovering catalog",
            Self::Select => "Selecting streams",
            Self::Run => "Extracting records",
            Self::Transfer => "Loading records into target",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    All,
    Discover,
    Select,
    Run,
    Transfer,
    Clean,
}

impl Target {
    pub fn steps(&self) -> Vec<Step> {
        match self {
            Self::All => Step::ALL.to_vec(),
            Self::Discover => vec![Step::Discover],
            Self::Select => vec![Step::Select],
            Self::Run => vec![Step::Run],
            Self::Transfer => vec![Step::Transfer],
            Self::Clean => vec![],
        }
    }
}

impl From<Step> for Target {
    fn from(step: Step) -> Self {
        match step {
            Step::Discover => Self::Discover,
            Step::Select => Self::Select,
            Step::Run => Self::Run,
            Step::Transfer => Self::Transfer,
        }
    }
}
