//! Replication Resolver
//!
//! Computes a volume's attachment state and replica-set topology by resolving
//! node references against the [`NodeIndex`].
//!
//! The volume's own status is authoritative and is never derived from the
//! placement data: a `Detached` volume may carry fully placed replica sets,
//! and an `UP` volume may be unattached.

use super::node_index::NodeIndex;
use super::volume_set::VolumeSet;
use crate::error::{Error, Result};
use crate::model::{Node, ReplicaSet, Volume};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

// =============================================================================
// Attached State
// =============================================================================

/// Where a volume is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachedState {
    Detached,
    /// Attached on the node with this hostname
    On(String),
}

impl std::fmt::Display for AttachedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachedState::Detached => write!(f, "Detached"),
            AttachedState::On(hostname) => write!(f, "on {}", hostname),
        }
    }
}

// =============================================================================
// Replication Info
// =============================================================================

/// Rendered topology of one replica set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicaSetInfo {
    /// Ordinal within the volume
    pub id: u32,
    /// `"<hostname> (Pool <n>)"` per placement
    pub node_info: Vec<String>,
    pub ha_increase: String,
    pub re_add_on: Vec<String>,
}

/// Replica topology of a volume
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReplicationInfo {
    #[serde(rename = "Rsi")]
    pub replica_sets: Vec<ReplicaSetInfo>,
    /// Upstream volume status
    pub status: String,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves attachment and replication for volumes of one snapshot
#[derive(Debug, Clone, Copy)]
pub struct ReplicationResolver<'a> {
    nodes: &'a NodeIndex,
    volumes: &'a VolumeSet,
}

impl<'a> ReplicationResolver<'a> {
    pub fn new(nodes: &'a NodeIndex, volumes: &'a VolumeSet) -> Self {
        Self { nodes, volumes }
    }

    /// `Detached` when the volume names no node, `on <hostname>` when it
    /// does. A node id missing from the index is an error, never `Detached`.
    pub fn attached_state(&self, volume: &Volume) -> Result<AttachedState> {
        Ok(match self.attached_node(volume)? {
            Some(node) => AttachedState::On(node.hostname.clone()),
            None => AttachedState::Detached,
        })
    }

    /// The node a volume is attached on, `None` when detached
    pub fn attached_node(&self, volume: &Volume) -> Result<Option<&'a Node>> {
        if !volume.is_attached() {
            return Ok(None);
        }
        self.nodes
            .by_id(&volume.attached_on)
            .map(Some)
            .ok_or_else(|| Error::DanglingAttachment {
                volume: volume.name.clone(),
                node_id: volume.attached_on.clone(),
            })
    }

    /// One entry per replica set, in volume order
    pub fn replication_info(&self, volume: &Volume) -> Result<ReplicationInfo> {
        let replica_sets = volume
            .replica_sets
            .iter()
            .map(|set| self.replica_set_info(volume, set))
            .collect::<Result<Vec<_>>>()?;

        Ok(ReplicationInfo {
            replica_sets,
            status: volume.status.to_string(),
        })
    }

    /// Replication info of the volume with this id or name
    pub fn replication_info_for(&self, identifier: &str) -> Result<ReplicationInfo> {
        let volume = self
            .volumes
            .lookup(identifier)
            .ok_or_else(|| Error::VolumeNotFound {
                volume: identifier.to_string(),
            })?;
        self.replication_info(volume)
    }

    /// Distinct node ids referenced by attachment or replica placement, in
    /// first-seen order
    pub fn referenced_node_ids<'v>(
        &self,
        volumes: impl IntoIterator<Item = &'v Volume>,
    ) -> Vec<String> {
        let mut ids: IndexSet<&'v str> = IndexSet::new();
        for volume in volumes {
            if volume.is_attached() {
                ids.insert(&volume.attached_on);
            }
            for set in &volume.replica_sets {
                for placement in &set.placements {
                    ids.insert(&placement.node_id);
                }
            }
        }
        ids.into_iter().map(str::to_string).collect()
    }

    fn replica_set_info(&self, volume: &Volume, set: &ReplicaSet) -> Result<ReplicaSetInfo> {
        let node_info = set
            .placements
            .iter()
            .map(|placement| {
                self.nodes
                    .by_id(&placement.node_id)
                    .map(|node| format!("{} (Pool {})", node.hostname, placement.pool))
                    .ok_or_else(|| Error::DanglingReplica {
                        volume: volume.name.clone(),
                        replica_set: set.id,
                        node_id: placement.node_id.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ReplicaSetInfo {
            id: set.id,
            node_info,
            ha_increase: set.ha_increase.clone(),
            re_add_on: set.re_add_on.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{ReplicaPlacement, VolumeStatus};
    use assert_matches::assert_matches;

    const H200: &str = "ip-70-0-87-200.brbnca.spcsdns.net";
    const H203: &str = "ip-70-0-87-203.brbnca.spcsdns.net";
    const H233: &str = "ip-70-0-87-233.brbnca.spcsdns.net";

    fn nodes() -> NodeIndex {
        NodeIndex::new(vec![
            Node::new("n200", H200),
            Node::new("n203", H203),
            Node::new("n233", H233),
        ])
    }

    fn replica_set(id: u32, placements: &[(&str, u32)]) -> ReplicaSet {
        ReplicaSet {
            id,
            placements: placements
                .iter()
                .map(|(node, pool)| ReplicaPlacement::new(*node, *pool))
                .collect(),
            ..Default::default()
        }
    }

    fn volume(name: &str, attached_on: &str, status: VolumeStatus, sets: Vec<ReplicaSet>) -> Volume {
        Volume {
            attached_on: attached_on.to_string(),
            status,
            replica_sets: sets,
            ..Volume::new(format!("id-{}", name), name)
        }
    }

    fn fixture() -> (NodeIndex, VolumeSet) {
        let volumes = VolumeSet::new(vec![
            volume("tp1", "", VolumeStatus::NotPresent, vec![replica_set(0, &[("n200", 0)])]),
            volume(
                "tp2",
                "",
                VolumeStatus::Up,
                vec![replica_set(0, &[("n200", 1)]), replica_set(1, &[("n203", 1)])],
            ),
            volume(
                "tp3",
                "n200",
                VolumeStatus::Up,
                vec![
                    replica_set(0, &[("n233", 0)]),
                    replica_set(1, &[("n200", 1)]),
                    replica_set(2, &[("n203", 0)]),
                ],
            ),
            volume("ghosted", "ghost", VolumeStatus::Up, vec![]),
        ]);
        (nodes(), volumes)
    }

    #[test]
    fn test_attached_state() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let tp1 = volumes.by_name("tp1").unwrap();
        assert_eq!(resolver.attached_state(tp1).unwrap(), AttachedState::Detached);
        assert_eq!(resolver.attached_state(tp1).unwrap().to_string(), "Detached");

        let tp3 = volumes.by_name("tp3").unwrap();
        let state = resolver.attached_state(tp3).unwrap();
        assert_eq!(state.to_string(), format!("on {}", H200));
        assert_eq!(state, AttachedState::On(nodes.by_id("n200").unwrap().hostname.clone()));
    }

    #[test]
    fn test_attached_state_dangling_node_is_inconsistent() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let err = resolver
            .attached_state(volumes.by_name("ghosted").unwrap())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inconsistent);
        assert_matches!(err, Error::DanglingAttachment { ref node_id, .. } if node_id == "ghost");
    }

    #[test]
    fn test_replication_info_topology() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let info = resolver.replication_info(volumes.by_name("tp3").unwrap()).unwrap();
        assert_eq!(info.status, "UP");
        assert_eq!(info.replica_sets.len(), 3);
        let ids: Vec<_> = info.replica_sets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(info.replica_sets[0].node_info, vec![format!("{} (Pool 0)", H233)]);
        assert_eq!(info.replica_sets[1].node_info, vec![format!("{} (Pool 1)", H200)]);
        assert_eq!(info.replica_sets[2].node_info, vec![format!("{} (Pool 0)", H203)]);
    }

    #[test]
    fn test_replication_info_matches_exchange_form() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let expected = format!(
            r#"{{"Rsi":[{{"Id":0,"NodeInfo":["{} (Pool 1)"],"HaIncrease":"","ReAddOn":[]}},{{"Id":1,"NodeInfo":["{} (Pool 1)"],"HaIncrease":"","ReAddOn":[]}}],"Status":"UP"}}"#,
            H200, H203
        );
        let expected: ReplicationInfo = serde_json::from_str(&expected).unwrap();
        assert_eq!(resolver.replication_info_for("tp2").unwrap(), expected);
    }

    #[test]
    fn test_replication_info_reads_upstream_document() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let upstream = r#"{"Rsi":[{"Id":0,"NodeInfo":["ip-70-0-87-200.brbnca.spcsdns.net (Pool 0)"],"HaIncrease":"","ReAddOn":[]}],"Status":"Detached"}"#;
        let parsed: ReplicationInfo = serde_json::from_str(upstream).unwrap();
        assert_eq!(parsed.replica_sets[0].ha_increase, "");
        assert_eq!(resolver.replication_info_for("tp1").unwrap(), parsed);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), upstream);
    }

    #[test]
    fn test_replication_info_carries_ha_increase() {
        let nodes = nodes();
        let mut set = replica_set(0, &[("n203", 1)]);
        set.ha_increase = "2".to_string();
        let volumes = VolumeSet::new(vec![volume("growing", "", VolumeStatus::Up, vec![set])]);
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let info = resolver.replication_info_for("growing").unwrap();
        assert_eq!(info.replica_sets[0].ha_increase, "2");
    }

    #[test]
    fn test_replication_info_round_trip() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let mut info = resolver.replication_info_for("tp3").unwrap();
        info.replica_sets[1].ha_increase = "1".to_string();
        info.replica_sets[1].re_add_on = vec!["n203".to_string()];

        let json = serde_json::to_string(&info).unwrap();
        let parsed: ReplicationInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, info);
    }

    #[test]
    fn test_volume_status_is_not_derived_from_placement() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        // Detached volume with a fully placed replica set keeps its status
        let tp1 = volumes.by_name("tp1").unwrap();
        let info = resolver.replication_info(tp1).unwrap();
        assert_eq!(info.status, "Detached");
        assert_eq!(info.replica_sets[0].node_info, vec![format!("{} (Pool 0)", H200)]);

        // UP volume that is not attached anywhere
        let tp2 = volumes.by_name("tp2").unwrap();
        assert_eq!(resolver.attached_state(tp2).unwrap(), AttachedState::Detached);
        assert_eq!(resolver.replication_info(tp2).unwrap().status, "UP");
    }

    #[test]
    fn test_replication_info_empty_and_dangling_placements() {
        let nodes = nodes();
        let volumes = VolumeSet::new(vec![
            volume("fresh", "", VolumeStatus::Down, vec![replica_set(0, &[])]),
            volume("broken", "", VolumeStatus::Up, vec![replica_set(4, &[("n200", 0), ("gone", 2)])]),
        ]);
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let info = resolver.replication_info_for("fresh").unwrap();
        assert_eq!(info.replica_sets.len(), 1);
        assert!(info.replica_sets[0].node_info.is_empty());

        let err = resolver.replication_info_for("broken").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inconsistent);
        assert_matches!(err, Error::DanglingReplica { replica_set: 4, ref node_id, .. } if node_id == "gone");

        assert_matches!(
            resolver.replication_info_for("nope"),
            Err(Error::VolumeNotFound { .. })
        );
    }

    #[test]
    fn test_referenced_node_ids() {
        let (nodes, volumes) = fixture();
        let resolver = ReplicationResolver::new(&nodes, &volumes);

        let ids = resolver.referenced_node_ids(volumes.all().filter(|v| v.name != "ghosted"));
        assert_eq!(ids, vec!["n200", "n203", "n233"]);
        for id in &ids {
            assert!(nodes.by_id(id).is_some());
        }
    }
}
