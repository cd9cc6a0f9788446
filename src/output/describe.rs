//! Detail views for `describe` commands

use super::{format_bytes, format_gib, join_or_none, new_table};
use crate::engine::{CorrelatedClaim, NodeIndex, ReplicationInfo};
use crate::model::{NodeStatus, Volume};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

fn field(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{:<16}{}", format!("{}:", label), value)
}

// =============================================================================
// Volume
// =============================================================================

/// A volume with its topology and consumers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDescription<'a> {
    #[serde(flatten)]
    pub volume: &'a Volume,
    pub state: String,
    pub replication: ReplicationInfo,
    /// `namespace/name` of each claim bound to the volume
    pub claims: Vec<String>,
    /// `namespace/name` of each pod mounting one of those claims
    pub pods: Vec<String>,
}

impl fmt::Display for VolumeDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        field(f, "Name", &self.volume.name)?;
        field(f, "Id", &self.volume.id)?;
        field(f, "Size", format_bytes(self.volume.size_bytes))?;
        field(f, "Status", &self.replication.status)?;
        field(f, "State", &self.state)?;
        field(f, "Claims", join_or_none(&self.claims))?;
        field(f, "Pods", join_or_none(&self.pods))?;

        if self.replication.replica_sets.is_empty() {
            return field(f, "Replica Sets", "<none>");
        }
        writeln!(f, "Replica Sets:")?;
        let mut table = new_table(["Set", "Nodes", "HA Increase", "Re-add On"]);
        for set in &self.replication.replica_sets {
            table.add_row(vec![
                set.id.to_string(),
                join_or_none(&set.node_info),
                if set.ha_increase.is_empty() {
                    "-".to_string()
                } else {
                    set.ha_increase.clone()
                },
                join_or_none(&set.re_add_on),
            ]);
        }
        writeln!(f, "{}", table)
    }
}

// =============================================================================
// Claim
// =============================================================================

/// A correlated claim with the containers mounting it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDescription<'a> {
    #[serde(flatten)]
    pub claim: &'a CorrelatedClaim,
    pub state: String,
    /// `namespace/pod: container` for each mounting container
    pub containers: Vec<String>,
}

impl fmt::Display for ClaimDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let volume = &self.claim.volume;
        field(f, "Name", &self.claim.name)?;
        field(f, "Namespace", &self.claim.namespace)?;
        field(f, "Volume", format!("{} ({})", volume.name, volume.id))?;
        field(f, "Size", format_bytes(volume.size_bytes))?;
        field(f, "Status", &volume.status)?;
        field(f, "State", &self.state)?;
        field(f, "Pods", join_or_none(&self.claim.pod_names))?;
        if self.containers.is_empty() {
            return field(f, "Containers", "<none>");
        }
        writeln!(f, "Containers:")?;
        for container in &self.containers {
            writeln!(f, "  {}", container)?;
        }
        Ok(())
    }
}

// =============================================================================
// Cluster
// =============================================================================

/// Capacity of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCapacity {
    pub hostname: String,
    pub status: NodeStatus,
    pub used: u64,
    pub capacity: u64,
}

/// Cluster-wide capacity summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDescription {
    pub captured_at: Option<DateTime<Utc>>,
    pub nodes: Vec<NodeCapacity>,
    pub used: u64,
    pub capacity: u64,
}

impl ClusterDescription {
    pub fn new(captured_at: Option<DateTime<Utc>>, nodes: &NodeIndex) -> Self {
        let (used, capacity) = nodes.cluster_capacity();
        let nodes = nodes
            .iter()
            .map(|node| {
                let (used, capacity) = NodeIndex::aggregate_capacity(node);
                NodeCapacity {
                    hostname: node.hostname.clone(),
                    status: node.status,
                    used,
                    capacity,
                }
            })
            .collect();

        Self {
            captured_at,
            nodes,
            used,
            capacity,
        }
    }
}

impl fmt::Display for ClusterDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.captured_at {
            Some(at) => field(f, "Captured At", at.to_rfc3339())?,
            None => field(f, "Captured At", "-")?,
        }
        field(f, "Nodes", self.nodes.len())?;

        if !self.nodes.is_empty() {
            let mut table = new_table(["Hostname", "Status", "Used (GiB)", "Capacity (GiB)"]);
            for node in &self.nodes {
                table.add_row(vec![
                    node.hostname.clone(),
                    node.status.to_string(),
                    format_gib(node.used),
                    format_gib(node.capacity),
                ]);
            }
            writeln!(f, "{}", table)?;
        }

        field(f, "Used (GiB)", format_gib(self.used))?;
        field(f, "Capacity (GiB)", format_gib(self.capacity))
    }
}
