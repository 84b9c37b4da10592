use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::store::NodeId;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown classification `{0}`")]
pub struct UnknownClassification(pub String);

/// Structural problems that make a node collection unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("node id `{0}` appears more than once")]
    DuplicateId(NodeId),
    #[error("parent links starting at `{0}` form a cycle")]
    ParentCycle(NodeId),
}

/// Import/export failures. Every variant leaves the in-memory map untouched.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("map document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("map document must be a JSON object")]
    NotAnObject,
    #[error("map document has an invalid shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("map document is inconsistent: {0}")]
    Store(#[from] StoreError),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
