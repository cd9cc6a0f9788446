//! Orchestrator Objects
//!
//! Pods and persistent volume claims, reduced to the fields the correlation
//! engine joins on. Conversions from the Kubernetes API types live here too.

use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod as KubePod};
use serde::{Deserialize, Serialize};

// =============================================================================
// Pod
// =============================================================================

/// A pod volume backed by a persistent volume claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimVolume {
    /// Volume name inside the pod spec
    pub name: String,
    /// Referenced claim
    pub claim_name: String,
}

/// A container and the claims it mounts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    /// Claim names mounted by this container
    #[serde(default)]
    pub claims: Vec<String>,
}

/// An orchestrator pod
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default)]
    pub namespace: String,

    pub name: String,

    /// Claim-backed volumes declared by the pod
    #[serde(default)]
    pub claim_volumes: Vec<ClaimVolume>,

    /// Containers in declaration order
    #[serde(default)]
    pub containers: Vec<Container>,
}

impl Pod {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Whether any pod volume references the claim
    pub fn references_claim(&self, claim_name: &str) -> bool {
        self.claim_volumes
            .iter()
            .any(|volume| volume.claim_name == claim_name)
    }

    /// Declare a claim-backed pod volume and mount it in a container,
    /// creating the container if needed
    pub fn with_claim(mut self, container: &str, claim_name: &str) -> Self {
        if !self.references_claim(claim_name) {
            self.claim_volumes.push(ClaimVolume {
                name: format!("{}-vol", claim_name),
                claim_name: claim_name.to_string(),
            });
        }
        match self.containers.iter_mut().find(|c| c.name == container) {
            Some(existing) => existing.claims.push(claim_name.to_string()),
            None => self.containers.push(Container {
                name: container.to_string(),
                claims: vec![claim_name.to_string()],
            }),
        }
        self
    }
}

impl From<&KubePod> for Pod {
    fn from(pod: &KubePod) -> Self {
        let mut converted = Pod::new(
            pod.metadata.namespace.clone().unwrap_or_default(),
            pod.metadata.name.clone().unwrap_or_default(),
        );
        let Some(spec) = pod.spec.as_ref() else {
            return converted;
        };

        converted.claim_volumes = spec
            .volumes
            .iter()
            .flatten()
            .filter_map(|volume| {
                volume
                    .persistent_volume_claim
                    .as_ref()
                    .map(|source| ClaimVolume {
                        name: volume.name.clone(),
                        claim_name: source.claim_name.clone(),
                    })
            })
            .collect();

        converted.containers = spec
            .containers
            .iter()
            .chain(spec.init_containers.iter().flatten())
            .map(|container| {
                let mut claims: Vec<String> = Vec::new();
                for mount in container.volume_mounts.iter().flatten() {
                    let claim = converted
                        .claim_volumes
                        .iter()
                        .find(|volume| volume.name == mount.name);
                    if let Some(volume) = claim {
                        // Same claim mounted at several paths counts once
                        if !claims.contains(&volume.claim_name) {
                            claims.push(volume.claim_name.clone());
                        }
                    }
                }
                Container {
                    name: container.name.clone(),
                    claims,
                }
            })
            .collect();

        converted
    }
}

// =============================================================================
// Claim
// =============================================================================

/// An orchestrator persistent volume claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    /// Name of the bound storage volume
    pub volume_name: String,
}

impl Claim {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        volume_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            volume_name: volume_name.into(),
        }
    }

    /// Convert a Kubernetes claim; unbound claims have no volume and yield `None`
    pub fn from_kube(pvc: &PersistentVolumeClaim) -> Option<Self> {
        let volume_name = pvc
            .spec
            .as_ref()
            .and_then(|spec| spec.volume_name.clone())
            .filter(|name| !name.is_empty())?;
        Some(Claim::new(
            pvc.metadata.namespace.clone().unwrap_or_default(),
            pvc.metadata.name.clone().unwrap_or_default(),
            volume_name,
        ))
    }
}
