//! storctl - Storage Resource Correlation
//!
//! A command-line client that joins a storage cluster's inventory (nodes,
//! volumes, replica placement) with the orchestrator's workloads (pods and
//! persistent volume claims) and answers "which volume backs this claim",
//! "which pods use it" and "where are its replicas".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                               Command Line                                  │
//! │   ┌─────────────────────┐   ┌──────────────────┐   ┌────────────────────┐   │
//! │   │  Command Registry   │──▶│  get / describe  │──▶│  Output (table,    │   │
//! │   │  (clap tree)        │   │  handlers        │   │  json, yaml)       │   │
//! │   └─────────────────────┘   └────────┬─────────┘   └────────────────────┘   │
//! ├──────────────────────────────────────┼──────────────────────────────────────┤
//! │                          Correlation Engine                                 │
//! │   ┌────────────┐ ┌────────────┐ ┌──────────┐ ┌─────────────┐ ┌───────────┐  │
//! │   │ NodeIndex  │ │ VolumeSet  │ │ PodIndex │ │ Replication │ │ Claim     │  │
//! │   │            │ │            │ │          │ │ Resolver    │ │ Correlator│  │
//! │   └────────────┘ └────────────┘ └──────────┘ └─────────────┘ └───────────┘  │
//! ├─────────────────────────────────────────────────────────────────────────────┤
//! │                               Sources                                       │
//! │   ┌─────────────────────────────┐     ┌─────────────────────────────────┐   │
//! │   │  Snapshot file (JSON/YAML)  │     │  Kubernetes API (pods, PVCs)    │   │
//! │   └─────────────────────────────┘     └─────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`model`]: Inventory records
//! - [`engine`]: Indexes and joins over one snapshot
//! - [`source`]: Snapshot file and Kubernetes sources
//! - [`output`]: Tables and detail views
//! - [`cli`]: Global options, command registry and handlers
//! - [`error`]: Error types and handling

pub mod cli;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod source;

// Re-export commonly used types
pub use engine::{
    AttachedState, ClaimCorrelator, ClaimIndex, ClusterView, CorrelatedClaim, LookupKey,
    NodeIndex, PodIndex, ReplicaSetInfo, ReplicationInfo, ReplicationResolver, Selection,
    VolumeSet,
};

pub use error::{Error, ErrorKind, Result};

pub use model::{
    Claim, Container, Node, NodeStatus, Pod, ReplicaPlacement, ReplicaSet, Snapshot, StoragePool,
    Volume, VolumeStatus,
};

pub use output::OutputFormat;

pub use source::{load_snapshot, FileSource, KubeSource, NamespaceScope, SourceConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
