//! Inventory Snapshot
//!
//! Everything fetched for one invocation. This is also the on-disk format
//! read by the file source.

use super::{Claim, Node, Pod, Volume};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage-side inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInventory {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
}

/// Orchestrator-side inventory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workloads {
    #[serde(default)]
    pub pods: Vec<Pod>,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

/// All datasets captured for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// When the datasets were captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub volumes: Vec<Volume>,

    #[serde(default)]
    pub pods: Vec<Pod>,

    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl Snapshot {
    /// Assemble a snapshot from the two independently fetched halves
    pub fn assemble(storage: StorageInventory, workloads: Workloads) -> Self {
        Self {
            captured_at: Some(Utc::now()),
            nodes: storage.nodes,
            volumes: storage.volumes,
            pods: workloads.pods,
            claims: workloads.claims,
        }
    }

    /// Split out the storage half
    pub fn storage(&self) -> StorageInventory {
        StorageInventory {
            nodes: self.nodes.clone(),
            volumes: self.volumes.clone(),
        }
    }

    /// Split out the orchestrator half
    pub fn workloads(&self) -> Workloads {
        Workloads {
            pods: self.pods.clone(),
            claims: self.claims.clone(),
        }
    }
}
