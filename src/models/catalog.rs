// file: src/models/catalog.rs
// description: structural check and summary of a singer catalog document
// reference: https://hub.meltano.com/singer/spec#catalog

use crate::error::{PipelineError, Result};
use crate::models::ArtifactKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEntry {
    pub tap_stream_id: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    pub streams: Vec<StreamEntry>,
}

#[derive(Deserialize)]
struct RawCatalog {
    streams: Vec<RawStream>,
}

#[derive(Deserialize)]
struct RawStream {
    tap_stream_id: Option<String>,
    stream: Option<String>,
    #[serde(default)]
    schema: Value,
    #[serde(default)]
    metadata: Vec<RawMetadata>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    breadcrumb: Vec<Value>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

impl RawStream {
    fn id(&self) -> String {
        self.tap_stream_id
            .clone()
            .or_else(|| self.stream.clone())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }

    // Stream-level metadata (empty breadcrumb) wins over the legacy
    // `schema.selected` flag.
    fn is_selected(&self) -> bool {
        let from_metadata = self
            .metadata
            .iter()
            .find(|entry| entry.breadcrumb.is_empty())
            .and_then(|entry| entry.metadata.get("selected"))
            .and_then(Value::as_bool);

        from_metadata.unwrap_or_else(|| {
            self.schema
                .get("selected")
                .and_then(Value::as_bool)
                .unwrap_or(false)
        })
    }
}

impl CatalogSummary {
    pub fn parse(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let raw: RawCatalog = serde_json::from_slice(bytes)?;

        let streams = raw
            .streams
            .iter()
            .map(|stream| StreamEntry {
                tap_stream_id: stream.id(),
                selected: stream.is_selected(),
            })
            .collect();

        Ok(Self { streams })
    }

    pub fn from_file(kind: ArtifactKind, path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| PipelineError::file(path, e))?;

        Self::parse(&bytes).map_err(|e| PipelineError::MalformedArtifact {
            kind,
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    pub fn selected_count(&self) -> usize {
        self.streams.iter().filter(|s| s.selected).count()
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.streams
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.tap_stream_id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "streams": [
            {
                "tap_stream_id": "taxes",
                "stream": "taxes",
                "schema": {"type": "object", "properties": {"id": {"type": "number"}}},
                "metadata": [
                    {"breadcrumb": [], "metadata": {"selected": true, "table-key-properties": ["id"]}},
                    {"breadcrumb": ["properties", "id"], "metadata": {"inclusion": "automatic"}}
                ]
            },
            {
                "tap_stream_id": "invoices",
                "schema": {"type": "object", "selected": true},
                "metadata": [{"breadcrumb": [], "metadata": {"selected": false}}]
            },
            {
                "stream": "suppliers",
                "schema": {"type": "object", "selected": true}
            }
        ]
    }"#;

    #[test]
    fn test_parse_counts_selected_streams() {
        let summary = CatalogSummary::parse(CATALOG.as_bytes()).unwrap();

        assert_eq!(summary.stream_count(), 3);
        assert_eq!(summary.selected_count(), 2);
        assert_eq!(summary.selected_ids(), vec!["taxes", "suppliers"]);
    }

    #[test]
    fn test_unselected_by_default() {
        let summary =
            CatalogSummary::parse(br#"{"streams":[{"tap_stream_id":"items"}]}"#).unwrap();
        assert_eq!(summary.selected_count(), 0);
    }

    #[test]
    fn test_rejects_documents_without_streams() {
        assert!(CatalogSummary::parse(b"{}").is_err());
        assert!(CatalogSummary::parse(b"not json").is_err());
        assert!(CatalogSummary::parse(br#"{"streams": {}}"#).is_err());
    }

    #[test]
    fn test_from_file_reports_malformed_artifact() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, "Traceback (most recent call last):").unwrap();

        let err = CatalogSummary::from_file(ArtifactKind::DiscoveredCatalog, &path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedArtifact {
                kind: ArtifactKind::DiscoveredCatalog,
                ..
            }
        ));
    }
}
