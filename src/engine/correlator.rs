//! Claim Correlator
//!
//! Joins orchestrator claims to the storage volumes backing them and to the
//! pods consuming them.

use super::identifier::{select, LookupKey, Selection};
use super::pod_index::PodIndex;
use super::replication::ReplicationResolver;
use super::volume_set::VolumeSet;
use crate::error::{Error, Result};
use crate::model::{Claim, Volume};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// Correlated Claim
// =============================================================================

/// A claim joined with its backing volume and consuming pods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedClaim {
    pub name: String,
    pub namespace: String,
    pub volume: Volume,
    /// `namespace/name` of each pod mounting the claim
    pub pod_names: Vec<String>,
}

// =============================================================================
// Claim Index
// =============================================================================

/// Claims of one snapshot with a volume name → claims index
#[derive(Debug, Clone, Default)]
pub struct ClaimIndex {
    claims: Vec<Claim>,
    by_volume: HashMap<String, Vec<usize>>,
}

impl ClaimIndex {
    pub fn new(claims: impl IntoIterator<Item = Claim>) -> Self {
        let claims: Vec<Claim> = claims.into_iter().collect();
        let mut by_volume: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, claim) in claims.iter().enumerate() {
            by_volume
                .entry(claim.volume_name.clone())
                .or_default()
                .push(pos);
        }
        Self { claims, by_volume }
    }

    pub fn all(&self) -> &[Claim] {
        &self.claims
    }

    /// Claims bound to the volume; usually one, possibly none
    pub fn claims_for_volume(&self, volume: &Volume) -> Vec<&Claim> {
        self.by_volume
            .get(&volume.name)
            .map(|positions| positions.iter().map(|&pos| &self.claims[pos]).collect())
            .unwrap_or_default()
    }
}

// =============================================================================
// Correlator
// =============================================================================

/// Joins claims, volumes and pods of one snapshot
#[derive(Debug, Clone, Copy)]
pub struct ClaimCorrelator<'a> {
    volumes: &'a VolumeSet,
    pods: &'a PodIndex,
    replication: ReplicationResolver<'a>,
}

impl<'a> ClaimCorrelator<'a> {
    pub fn new(
        volumes: &'a VolumeSet,
        pods: &'a PodIndex,
        replication: ReplicationResolver<'a>,
    ) -> Self {
        Self {
            volumes,
            pods,
            replication,
        }
    }

    /// Correlate every claim. A claim whose volume is missing aborts the
    /// whole batch.
    pub fn correlate(&self, claims: &[Claim]) -> Result<Vec<CorrelatedClaim>> {
        claims
            .iter()
            .map(|claim| self.correlate_one(claim))
            .collect()
    }

    /// Claims whose bound volume belongs to this storage cluster
    pub fn managed_claims<'c>(&self, claims: &'c [Claim]) -> Vec<&'c Claim> {
        claims
            .iter()
            .filter(|claim| self.volumes.by_name(&claim.volume_name).is_some())
            .collect()
    }

    /// Keep entries whose claim name, volume name, volume id or attached
    /// hostname equals one of the identifiers
    pub fn filter_by_identifiers(
        &self,
        all: Vec<CorrelatedClaim>,
        identifiers: &[String],
    ) -> Selection<CorrelatedClaim> {
        select(all, identifiers, |claim, identifier| {
            self.lookup_keys(claim)
                .iter()
                .any(|key| key.matches(identifier))
        })
    }

    fn correlate_one(&self, claim: &Claim) -> Result<CorrelatedClaim> {
        let volume = self
            .volumes
            .by_name(&claim.volume_name)
            .ok_or_else(|| Error::ClaimVolumeNotFound {
                namespace: claim.namespace.clone(),
                claim: claim.name.clone(),
                volume: claim.volume_name.clone(),
            })?;

        let pod_names: Vec<String> = self
            .pods
            .pods_using_namespaced_claim(&claim.namespace, &claim.name)
            .iter()
            .map(|pod| pod.qualified_name())
            .collect();

        debug!(
            claim = %claim.name,
            volume = %volume.name,
            pods = pod_names.len(),
            "Correlated claim"
        );

        Ok(CorrelatedClaim {
            name: claim.name.clone(),
            namespace: claim.namespace.clone(),
            volume: volume.clone(),
            pod_names,
        })
    }

    fn lookup_keys<'k>(&'k self, claim: &'k CorrelatedClaim) -> Vec<LookupKey<'k>> {
        let mut keys = vec![
            LookupKey::ClaimName(&claim.name),
            LookupKey::VolumeName(&claim.volume.name),
            LookupKey::VolumeId(&claim.volume.id),
        ];
        // An unresolvable attachment just means there is no host to match on
        if let Ok(Some(node)) = self.replication.attached_node(&claim.volume) {
            keys.push(LookupKey::AttachedHost(&node.hostname));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NodeIndex;
    use crate::error::ErrorKind;
    use crate::model::{Node, Pod, StoragePool, VolumeStatus};
    use assert_matches::assert_matches;

    struct Fixture {
        nodes: NodeIndex,
        volumes: VolumeSet,
        pods: PodIndex,
    }

    impl Fixture {
        fn new() -> Self {
            let mut a = Node::new("A", "h1");
            a.pools = vec![StoragePool { id: 0, used: 5, total_size: 10 }];
            let b = Node::new("B", "h2");

            let mut v1 = Volume::new("vid-1", "V1");
            v1.attached_on = "A".to_string();
            v1.status = VolumeStatus::Up;
            let v3 = Volume::new("vid-3", "V3");

            Self {
                nodes: NodeIndex::new(vec![a, b]),
                volumes: VolumeSet::new(vec![v1, v3]),
                pods: PodIndex::new(vec![
                    Pod::new("ns", "P1").with_claim("app", "C1"),
                    Pod::new("ns", "P2").with_claim("app", "C1").with_claim("app", "C3"),
                    Pod::new("elsewhere", "P3").with_claim("app", "C1"),
                ]),
            }
        }

        fn correlator(&self) -> ClaimCorrelator<'_> {
            ClaimCorrelator::new(
                &self.volumes,
                &self.pods,
                ReplicationResolver::new(&self.nodes, &self.volumes),
            )
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_correlate_claim() {
        let fixture = Fixture::new();
        let correlated = fixture
            .correlator()
            .correlate(&[Claim::new("ns", "C1", "V1")])
            .unwrap();

        assert_eq!(correlated.len(), 1);
        assert_eq!(correlated[0].name, "C1");
        assert_eq!(correlated[0].volume, *fixture.volumes.by_name("V1").unwrap());
        assert_eq!(correlated[0].pod_names, vec!["ns/P1", "ns/P2"]);
    }

    #[test]
    fn test_correlate_unused_claim_has_no_pods() {
        let fixture = Fixture::new();
        let correlated = fixture
            .correlator()
            .correlate(&[Claim::new("other", "C3", "V3")])
            .unwrap();
        assert!(correlated[0].pod_names.is_empty());
    }

    #[test]
    fn test_correlate_missing_volume_fails_whole_batch() {
        let fixture = Fixture::new();
        let result = fixture.correlator().correlate(&[
            Claim::new("ns", "C1", "V1"),
            Claim::new("ns", "C2", "not-there"),
        ]);

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_matches!(err, Error::ClaimVolumeNotFound { ref claim, .. } if claim == "C2");
    }

    #[test]
    fn test_managed_claims() {
        let fixture = Fixture::new();
        let claims = vec![
            Claim::new("ns", "C1", "V1"),
            Claim::new("ns", "foreign", "pvc-from-another-provisioner"),
            Claim::new("ns", "C3", "V3"),
        ];
        let managed: Vec<_> = fixture
            .correlator()
            .managed_claims(&claims)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(managed, vec!["C1", "C3"]);
    }

    #[test]
    fn test_filter_by_each_field() {
        let fixture = Fixture::new();
        let correlator = fixture.correlator();
        let all = correlator
            .correlate(&[Claim::new("ns", "C1", "V1"), Claim::new("ns", "C3", "V3")])
            .unwrap();

        for identifier in ["C1", "V1", "vid-1", "h1"] {
            let selection = correlator.filter_by_identifiers(all.clone(), &ids(&[identifier]));
            assert!(selection.is_complete(), "{} should match", identifier);
            assert_eq!(selection.items().len(), 1);
            assert_eq!(selection.items()[0].name, "C1");
        }

        // Substrings never match
        let selection = correlator.filter_by_identifiers(all.clone(), &ids(&["C"]));
        assert!(selection.items().is_empty());
    }

    #[test]
    fn test_filter_no_match_keeps_other_matches() {
        let fixture = Fixture::new();
        let correlator = fixture.correlator();
        let all = correlator
            .correlate(&[Claim::new("ns", "C1", "V1"), Claim::new("ns", "C3", "V3")])
            .unwrap();

        let selection = correlator.filter_by_identifiers(all, &ids(&["V3", "unknown"]));
        assert_matches!(selection.error(), Some(Error::NoMatch { identifier }) if identifier == "unknown");
        assert_eq!(selection.items().len(), 1);
        assert_eq!(selection.items()[0].name, "C3");
    }

    #[test]
    fn test_claim_index() {
        let fixture = Fixture::new();
        let index = ClaimIndex::new(vec![
            Claim::new("ns", "C1", "V1"),
            Claim::new("ns2", "C1-clone", "V1"),
        ]);
        let v1 = fixture.volumes.by_name("V1").unwrap();
        let v3 = fixture.volumes.by_name("V3").unwrap();
        assert_eq!(index.claims_for_volume(v1).len(), 2);
        assert!(index.claims_for_volume(v3).is_empty());
        assert_eq!(index.all().len(), 2);
    }
}
