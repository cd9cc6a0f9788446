//! Kubernetes Workload Source
//!
//! Lists pods and persistent volume claims from the Kubernetes API and reduces
//! them to the engine's orchestrator types.

use super::{NamespaceScope, WorkloadSource};
use crate::error::Result;
use crate::model::{Claim, Pod, Workloads};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod as KubePod};
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::{debug, info};

/// Live orchestrator inventory
#[derive(Clone)]
pub struct KubeSource {
    client: Client,
}

impl KubeSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the ambient kubeconfig or in-cluster configuration
    pub async fn connect() -> Result<Self> {
        let client = Client::try_default().await?;
        info!("Connected to Kubernetes API");
        Ok(Self::new(client))
    }

    fn apis(&self, scope: &NamespaceScope) -> (Api<KubePod>, Api<PersistentVolumeClaim>) {
        match scope {
            NamespaceScope::All => (Api::all(self.client.clone()), Api::all(self.client.clone())),
            NamespaceScope::Namespace(ns) => (
                Api::namespaced(self.client.clone(), ns),
                Api::namespaced(self.client.clone(), ns),
            ),
        }
    }
}

#[async_trait]
impl WorkloadSource for KubeSource {
    fn name(&self) -> &str {
        "kubernetes"
    }

    async fn workloads(&self, scope: &NamespaceScope) -> Result<Workloads> {
        let (pods_api, claims_api) = self.apis(scope);
        let params = ListParams::default();

        let (pod_list, claim_list) =
            futures::future::try_join(pods_api.list(&params), claims_api.list(&params)).await?;

        let pods: Vec<Pod> = pod_list.items.iter().map(Pod::from).collect();
        let claims: Vec<Claim> = claim_list
            .items
            .iter()
            .filter_map(Claim::from_kube)
            .collect();

        debug!(
            pods = pods.len(),
            claims = claims.len(),
            unbound = claim_list.items.len() - claims.len(),
            "Listed workloads"
        );

        Ok(Workloads { pods, claims })
    }
}
