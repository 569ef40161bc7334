// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod artifact;
pub mod catalog;
pub mod message;
pub mod step;

pub use artifact::{ArtifactKind, ArtifactSet, ArtifactStatus};
pub use catalog::{CatalogSummary, StreamEntry};
pub use message::MessageSummary;
pub use step::{Step, Target, ToolRole};
