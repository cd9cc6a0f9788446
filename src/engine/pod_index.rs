//! Pod Index
//!
//! Answers "which pods reference claim X" and "which containers mount claim
//! X" from a claim name → pod positions map built once per snapshot.

use crate::model::Pod;
use std::collections::HashMap;
use tracing::debug;

/// A container inside a pod that mounts a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerRef<'a> {
    pub pod: &'a Pod,
    pub container: &'a str,
}

/// Index over the orchestrator's pods
#[derive(Debug, Clone, Default)]
pub struct PodIndex {
    pods: Vec<Pod>,
    /// Claim name -> positions in `pods`, ascending
    by_claim: HashMap<String, Vec<usize>>,
}

impl PodIndex {
    pub fn new(pods: impl IntoIterator<Item = Pod>) -> Self {
        let pods: Vec<Pod> = pods.into_iter().collect();
        let mut by_claim: HashMap<String, Vec<usize>> = HashMap::new();

        for (pos, pod) in pods.iter().enumerate() {
            for volume in &pod.claim_volumes {
                let positions = by_claim.entry(volume.claim_name.clone()).or_default();
                // A pod declaring the same claim twice is still one pod
                if positions.last() != Some(&pos) {
                    positions.push(pos);
                }
            }
        }

        debug!(pods = pods.len(), claims = by_claim.len(), "Built pod index");

        Self { pods, by_claim }
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pod> + '_ {
        self.pods.iter()
    }

    /// Pods whose volumes reference the claim, in input order; empty if none
    pub fn pods_using_claim(&self, claim_name: &str) -> Vec<&Pod> {
        self.by_claim
            .get(claim_name)
            .map(|positions| positions.iter().map(|&pos| &self.pods[pos]).collect())
            .unwrap_or_default()
    }

    /// Like [`Self::pods_using_claim`], restricted to the claim's namespace.
    /// An empty namespace matches pods in any namespace.
    pub fn pods_using_namespaced_claim(&self, namespace: &str, claim_name: &str) -> Vec<&Pod> {
        let mut pods = self.pods_using_claim(claim_name);
        if !namespace.is_empty() {
            pods.retain(|pod| pod.namespace == namespace);
        }
        pods
    }

    /// One entry per container that mounts the claim, pod order then
    /// container declaration order
    pub fn containers_for_claim(&self, claim_name: &str) -> Vec<ContainerRef<'_>> {
        self.pods_using_claim(claim_name)
            .into_iter()
            .flat_map(|pod| {
                pod.containers
                    .iter()
                    .filter(|container| container.claims.iter().any(|c| c == claim_name))
                    .map(move |container| ContainerRef {
                        pod,
                        container: container.name.as_str(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pods() -> PodIndex {
        PodIndex::new(vec![
            Pod::new("wp1", "wordpress-mysql-684ddbbb55-zjs7b").with_claim("mysql", "mysql-pvc-1"),
            Pod::new("wp1", "wordpress-7f6d665c6f-5wpm6").with_claim("wordpress", "wp-pv-claim"),
            Pod::new("wp1", "wordpress-7f6d665c6f-7qcch")
                .with_claim("wordpress", "wp-pv-claim")
                .with_claim("backup", "wp-pv-claim")
                .with_claim("backup", "mysql-pvc-1"),
            Pod::new("other", "wordpress-7f6d665c6f-ddjj6").with_claim("wordpress", "wp-pv-claim"),
            Pod::new("wp1", "idle"),
        ])
    }

    #[test]
    fn test_pods_using_claim_fan_out() {
        let index = pods();
        let names: Vec<_> = index
            .pods_using_claim("wp-pv-claim")
            .iter()
            .map(|p| p.qualified_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "wp1/wordpress-7f6d665c6f-5wpm6",
                "wp1/wordpress-7f6d665c6f-7qcch",
                "other/wordpress-7f6d665c6f-ddjj6",
            ]
        );
    }

    #[test]
    fn test_pods_using_unknown_claim_is_empty() {
        let index = pods();
        assert!(index.pods_using_claim("nope").is_empty());
        assert!(index.containers_for_claim("nope").is_empty());
    }

    #[test]
    fn test_pods_using_namespaced_claim() {
        let index = pods();
        assert_eq!(index.pods_using_namespaced_claim("wp1", "wp-pv-claim").len(), 2);
        assert_eq!(index.pods_using_namespaced_claim("other", "wp-pv-claim").len(), 1);
        assert_eq!(index.pods_using_namespaced_claim("", "wp-pv-claim").len(), 3);
    }

    #[test]
    fn test_containers_for_claim_reports_each_container() {
        let index = pods();
        let refs: Vec<_> = index
            .containers_for_claim("wp-pv-claim")
            .iter()
            .map(|r| (r.pod.name.as_str(), r.container))
            .collect();
        assert_eq!(
            refs,
            vec![
                ("wordpress-7f6d665c6f-5wpm6", "wordpress"),
                ("wordpress-7f6d665c6f-7qcch", "wordpress"),
                ("wordpress-7f6d665c6f-7qcch", "backup"),
                ("wordpress-7f6d665c6f-ddjj6", "wordpress"),
            ]
        );

        let mysql: Vec<_> = index
            .containers_for_claim("mysql-pvc-1")
            .iter()
            .map(|r| (r.pod.name.as_str(), r.container))
            .collect();
        assert_eq!(
            mysql,
            vec![
                ("wordpress-mysql-684ddbbb55-zjs7b", "mysql"),
                ("wordpress-7f6d665c6f-7qcch", "backup"),
            ]
        );
    }
}
