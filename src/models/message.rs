// file: src/models/message.rs
// description: line-oriented summary of a singer message stream
// reference: Singer message format (SCHEMA, RECORD, STATE)

use crate::error::{PipelineError, Result};
use crate::models::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub schema_messages: u64,
    pub record_messages: u64,
    pub state_messages: u64,
    pub other_messages: u64,
    pub record_streams: BTreeSet<String>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    stream: Option<String>,
}

impl MessageSummary {
    /// Scans `reader` one message per line. Blank lines are skipped; any
    /// other line must be a JSON object with a string `type`.
    pub fn inspect<R: BufRead>(reader: R) -> std::result::Result<Self, String> {
        let mut summary = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("line {}: {}", index + 1, e))?;
            if line.trim().is_empty() {
                continue;
            }

            let envelope: Envelope = serde_json::from_str(&line)
                .map_err(|e| format!("line {}: {}", index + 1, e))?;

            match envelope.kind.as_str() {
                "SCHEMA" => summary.schema_messages += 1,
                "RECORD" => {
                    summary.record_messages += 1;
                    if let Some(stream) = envelope.stream {
                        summary.record_streams.insert(stream);
                    }
                }
                "STATE" => summary.state_messages += 1,
                _ => summary.other_messages += 1,
            }
        }

        Ok(summary)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| PipelineError::file(path, e))?;

        Self::inspect(BufReader::new(file)).map_err(|message| PipelineError::MalformedArtifact {
            kind: ArtifactKind::DataStream,
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn total_messages(&self) -> u64 {
        self.schema_messages + self.record_messages + self.state_messages + self.other_messages
    }
}
