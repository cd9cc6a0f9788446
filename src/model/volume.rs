//! Storage Volume
//!
//! A volume as enumerated from the storage control plane, with its
//! attachment and replica placement.

use serde::{Deserialize, Serialize};

// =============================================================================
// Volume Status
// =============================================================================

/// Volume status as reported upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeStatus {
    Up,
    Down,
    Degraded,
    /// Volume is not present on any node
    NotPresent,
    #[default]
    Unknown,
}

impl std::fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeStatus::Up => write!(f, "UP"),
            VolumeStatus::Down => write!(f, "DOWN"),
            VolumeStatus::Degraded => write!(f, "DEGRADED"),
            VolumeStatus::NotPresent => write!(f, "Detached"),
            VolumeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

// =============================================================================
// Replica Placement
// =============================================================================

/// Where one copy of a replica set lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaPlacement {
    /// Node identifier
    pub node_id: String,
    /// Pool index on that node
    #[serde(default)]
    pub pool: u32,
}

impl ReplicaPlacement {
    pub fn new(node_id: impl Into<String>, pool: u32) -> Self {
        Self {
            node_id: node_id.into(),
            pool,
        }
    }
}

/// One replicated copy group of a volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSet {
    /// Ordinal within the volume
    pub id: u32,
    /// Placements; empty when no pool is assigned yet
    #[serde(default)]
    pub placements: Vec<ReplicaPlacement>,
    /// HA increase marker, carried as reported upstream
    #[serde(default)]
    pub ha_increase: String,
    /// Nodes the set is being re-added on
    #[serde(default)]
    pub re_add_on: Vec<String>,
}

// =============================================================================
// Volume
// =============================================================================

/// A storage cluster volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Internal identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Size in bytes
    #[serde(default)]
    pub size_bytes: u64,

    /// Node the volume is attached on; empty when detached
    #[serde(default)]
    pub attached_on: String,

    /// Upstream volume status
    #[serde(default)]
    pub status: VolumeStatus,

    /// Replica sets in upstream order
    #[serde(default)]
    pub replica_sets: Vec<ReplicaSet>,
}

impl Volume {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether the volume names an attached node
    pub fn is_attached(&self) -> bool {
        !self.attached_on.is_empty()
    }
}
