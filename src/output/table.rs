//! List tables for `get` commands

use super::{format_bytes, join_or_none, new_table, NO_RESOURCES};
use crate::engine::CorrelatedClaim;
use crate::model::{Node, Volume};
use serde::Serialize;

/// A volume with its resolved attachment state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeSummary<'a> {
    #[serde(flatten)]
    pub volume: &'a Volume,
    pub state: String,
}

/// A correlated claim with its volume's attachment state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSummary<'a> {
    #[serde(flatten)]
    pub claim: &'a CorrelatedClaim,
    pub state: String,
}

/// Node table. Wide output adds identifiers, addresses and pool count.
pub fn nodes_table(nodes: &[&Node], wide: bool, show_labels: bool) -> String {
    if nodes.is_empty() {
        return NO_RESOURCES.to_string();
    }

    let mut header = Vec::new();
    if wide {
        header.push("Id");
    }
    header.push("Hostname");
    if wide {
        header.extend(["IP", "Data IP"]);
    }
    header.extend(["Version", "SchedulerNodeName", "Used", "Capacity"]);
    if wide {
        header.push("# Pools");
    }
    header.push("Status");
    if show_labels {
        header.push("Labels");
    }

    let mut table = new_table(header);
    for node in nodes {
        let (used, capacity) = node.capacity();
        let mut row = Vec::new();
        if wide {
            row.push(node.id.clone());
        }
        row.push(node.hostname.clone());
        if wide {
            row.push(node.mgmt_ip.clone());
            row.push(node.data_ip.clone());
        }
        row.push(node.version.clone().unwrap_or_else(|| "-".to_string()));
        row.push(node.scheduler_node_name.clone());
        row.push(format_bytes(used));
        row.push(format_bytes(capacity));
        if wide {
            row.push(node.pools.len().to_string());
        }
        row.push(node.status.to_string());
        if show_labels {
            let labels: Vec<String> = node
                .labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            row.push(join_or_none(&labels));
        }
        table.add_row(row);
    }
    table.to_string()
}

pub fn volumes_table(volumes: &[VolumeSummary<'_>]) -> String {
    if volumes.is_empty() {
        return NO_RESOURCES.to_string();
    }

    let mut table = new_table(["Id", "Name", "Size", "Status", "State", "Replicas"]);
    for summary in volumes {
        let volume = summary.volume;
        table.add_row(vec![
            volume.id.clone(),
            volume.name.clone(),
            format_bytes(volume.size_bytes),
            volume.status.to_string(),
            summary.state.clone(),
            volume.replica_sets.len().to_string(),
        ]);
    }
    table.to_string()
}

pub fn claims_table(claims: &[ClaimSummary<'_>]) -> String {
    if claims.is_empty() {
        return NO_RESOURCES.to_string();
    }

    let mut table = new_table(["Name", "Namespace", "Volume", "State", "Pods"]);
    for summary in claims {
        let claim = summary.claim;
        table.add_row(vec![
            claim.name.clone(),
            claim.namespace.clone(),
            claim.volume.name.clone(),
            summary.state.clone(),
            join_or_none(&claim.pod_names),
        ]);
    }
    table.to_string()
}
