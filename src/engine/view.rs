//! Cluster View
//!
//! Owns every index built from one snapshot. Nothing here is memoized: each
//! call recomputes from the immutable indexes.

use super::correlator::{ClaimCorrelator, ClaimIndex};
use super::node_index::NodeIndex;
use super::pod_index::PodIndex;
use super::replication::ReplicationResolver;
use super::volume_set::VolumeSet;
use crate::model::Snapshot;
use chrono::{DateTime, Utc};
use tracing::info;

/// Indexes over one snapshot
#[derive(Debug, Clone, Default)]
pub struct ClusterView {
    captured_at: Option<DateTime<Utc>>,
    nodes: NodeIndex,
    volumes: VolumeSet,
    pods: PodIndex,
    claims: ClaimIndex,
}

impl ClusterView {
    pub fn new(snapshot: Snapshot) -> Self {
        let view = Self {
            captured_at: snapshot.captured_at,
            nodes: NodeIndex::new(snapshot.nodes),
            volumes: VolumeSet::new(snapshot.volumes),
            pods: PodIndex::new(snapshot.pods),
            claims: ClaimIndex::new(snapshot.claims),
        };

        info!(
            nodes = view.nodes.len(),
            volumes = view.volumes.len(),
            pods = view.pods.len(),
            claims = view.claims.all().len(),
            "Indexed snapshot"
        );

        view
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        self.captured_at
    }

    pub fn nodes(&self) -> &NodeIndex {
        &self.nodes
    }

    pub fn volumes(&self) -> &VolumeSet {
        &self.volumes
    }

    pub fn pods(&self) -> &PodIndex {
        &self.pods
    }

    pub fn claims(&self) -> &ClaimIndex {
        &self.claims
    }

    pub fn resolver(&self) -> ReplicationResolver<'_> {
        ReplicationResolver::new(&self.nodes, &self.volumes)
    }

    pub fn correlator(&self) -> ClaimCorrelator<'_> {
        ClaimCorrelator::new(&self.volumes, &self.pods, self.resolver())
    }
}
