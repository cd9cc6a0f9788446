//! Storage Node
//!
//! A storage cluster member: network endpoints, capacity pools and labels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Storage Pool
// =============================================================================

/// A capacity unit within a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePool {
    /// Pool index on the node
    #[serde(default)]
    pub id: u32,

    /// Used bytes
    #[serde(default)]
    pub used: u64,

    /// Total bytes
    #[serde(default)]
    pub total_size: u64,
}

// =============================================================================
// Node Status
// =============================================================================

/// Node status as reported by the storage control plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    Ok,
    Offline,
    Maintenance,
    Decommission,
    NotInQuorum,
    Error,
    #[default]
    Unknown,
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Ok => write!(f, "Ok"),
            NodeStatus::Offline => write!(f, "Offline"),
            NodeStatus::Maintenance => write!(f, "Maintenance"),
            NodeStatus::Decommission => write!(f, "Decommission"),
            NodeStatus::NotInQuorum => write!(f, "Not in quorum"),
            NodeStatus::Error => write!(f, "Error"),
            NodeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// A storage cluster node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Cluster-assigned node identifier
    pub id: String,

    /// Hostname
    #[serde(default)]
    pub hostname: String,

    /// Management IP
    #[serde(default)]
    pub mgmt_ip: String,

    /// Data IP
    #[serde(default)]
    pub data_ip: String,

    /// Name the orchestrator's scheduler knows this node by
    #[serde(default)]
    pub scheduler_node_name: String,

    /// Storage pools
    #[serde(default)]
    pub pools: Vec<StoragePool>,

    /// Node status
    #[serde(default)]
    pub status: NodeStatus,

    /// Node labels
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Storage software version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Sum of (used, total) bytes over all pools
    pub fn capacity(&self) -> (u64, u64) {
        self.pools.iter().fold((0, 0), |(used, total), pool| {
            (
                used.saturating_add(pool.used),
                total.saturating_add(pool.total_size),
            )
        })
    }
}
