// file: src/models/artifact.rs
// description: generated file artifacts handed from one step to the next
// reference: internal data structures

use crate::config::ArtifactsConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    DiscoveredCatalog,
    SelectedCatalog,
    DataStream,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::DiscoveredCatalog,
        ArtifactKind::SelectedCatalog,
        ArtifactKind::DataStream,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DiscoveredCatalog => "discovered catalog",
            Self::SelectedCatalog => "selected catalog",
            Self::DataStream => "data stream",
        }
    }

    pub fn is_catalog(&self) -> bool {
        matches!(self, Self::DiscoveredCatalog | Self::SelectedCatalog)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved locations of the three generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub catalog: PathBuf,
    pub selected_catalog: PathBuf,
    pub data: PathBuf,
}

impl ArtifactSet {
    pub fn new(
        catalog: impl Into<PathBuf>,
        selected_catalog: impl Into<PathBuf>,
        data: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            selected_catalog: selected_catalog.into(),
            data: data.into(),
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(
            config.resolve(&config.catalog),
            config.resolve(&config.selected_catalog),
            config.resolve(&config.data),
        )
    }

    pub fn path(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::DiscoveredCatalog => &self.catalog,
            ArtifactKind::SelectedCatalog => &self.selected_catalog,
            ArtifactKind::DataStream => &self.data,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &Path)> {
        ArtifactKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.path(kind)))
    }

    pub fn status(&self) -> Vec<ArtifactStatus> {
        self.iter()
            .map(|(kind, path)| ArtifactStatus::probe(kind, path))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
}

impl ArtifactStatus {
    pub fn probe(kind: ArtifactKind, path: &Path) -> Self {
        let metadata = fs::metadata(path).ok().filter(|m| m.is_file());

        Self {
            kind,
            path: path.to_path_buf(),
            exists: metadata.is_some(),
            size_bytes: metadata.map(|m| m.len()).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_iter_follows_pipeline_order() {
        let set = ArtifactSet::new("a.json", "b.json", "c.txt");
        let kinds: Vec<ArtifactKind> = set.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
        assert_eq!(set.path(ArtifactKind::DataStream), Path::new("c.txt"));
    }

    #[test]
    fn test_probe_reports_presence_and_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");

        let missing = ArtifactStatus::probe(ArtifactKind::DiscoveredCatalog, &path);
        assert!(!missing.exists);
        assert!(missing.is_empty());

        fs::write(&path, "{\"streams\":[]}").unwrap();
        let present = ArtifactStatus::probe(ArtifactKind::DiscoveredCatalog, &path);
        assert!(present.exists);
        assert_eq!(present.size_bytes, 14);
    }

    #[test]
    fn test_probe_ignores_directories() {
        let temp = TempDir::new().unwrap();
        let status = ArtifactStatus::probe(ArtifactKind::DataStream, temp.path());
        assert!(!status.exists);
    }
}
