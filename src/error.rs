//! Error types for storctl
//!
//! Provides structured error types for the correlation engine, the inventory
//! sources that feed it, and the command-line layer.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Snapshot Resolution Errors (NotFound)
    // =========================================================================
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: String },

    #[error("Volume not found: {volume}")]
    VolumeNotFound { volume: String },

    #[error("Volume {volume} bound to claim {namespace}/{claim} not found")]
    ClaimVolumeNotFound {
        namespace: String,
        claim: String,
        volume: String,
    },

    // =========================================================================
    // Snapshot Consistency Errors (Inconsistent)
    // =========================================================================
    #[error("Volume {volume} is attached to unknown node {node_id}")]
    DanglingAttachment { volume: String, node_id: String },

    #[error("Replica set {replica_set} of volume {volume} is placed on unknown node {node_id}")]
    DanglingReplica {
        volume: String,
        replica_set: u32,
        node_id: String,
    },

    // =========================================================================
    // Filter Errors (NoMatch)
    // =========================================================================
    #[error("No resources found matching {identifier}")]
    NoMatch { identifier: String },

    // =========================================================================
    // Source Errors
    // =========================================================================
    #[error("Timed out fetching {source_name} after {after:?}")]
    Timeout { source_name: String, after: Duration },

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A node, volume or claim reference does not resolve against the snapshot
    NotFound,
    /// A structurally required reference inside the snapshot is dangling
    Inconsistent,
    /// A caller-supplied identifier filter matched nothing
    NoMatch,
    /// Fetching or decoding an inventory failed
    Source,
    /// Invalid invocation or settings
    Configuration,
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NodeNotFound { .. }
            | Error::VolumeNotFound { .. }
            | Error::ClaimVolumeNotFound { .. } => ErrorKind::NotFound,

            Error::DanglingAttachment { .. } | Error::DanglingReplica { .. } => {
                ErrorKind::Inconsistent
            }

            Error::NoMatch { .. } => ErrorKind::NoMatch,

            Error::Configuration(_) => ErrorKind::Configuration,

            Error::Timeout { .. }
            | Error::Kube(_)
            | Error::JsonParse(_)
            | Error::YamlParse(_)
            | Error::Io(_) => ErrorKind::Source,
        }
    }
}

/// Result type alias for storctl
pub type Result<T> = std::result::Result<T, Error>;
