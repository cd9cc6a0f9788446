//! Inventory Sources
//!
//! Collaborators that fetch the datasets the engine joins. The storage and
//! orchestrator halves are independent and are fetched concurrently, each
//! bounded by the caller's timeout.

pub mod file;
pub mod orchestrator;

pub use self::file::FileSource;
pub use self::orchestrator::KubeSource;

use crate::error::{Error, Result};
use crate::model::{Snapshot, StorageInventory, Workloads};
use async_trait::async_trait;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

// =============================================================================
// Configuration
// =============================================================================

/// Which namespaces orchestrator objects are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Namespace(String),
}

impl NamespaceScope {
    /// Whether an object in `namespace` is in scope
    pub fn contains(&self, namespace: &str) -> bool {
        match self {
            NamespaceScope::All => true,
            NamespaceScope::Namespace(ns) => ns == namespace,
        }
    }
}

impl std::fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamespaceScope::All => write!(f, "all namespaces"),
            NamespaceScope::Namespace(ns) => write!(f, "namespace {}", ns),
        }
    }
}

/// Where the snapshot comes from
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Snapshot file holding the storage inventory (and, without `kube`,
    /// the orchestrator inventory too)
    pub snapshot_path: PathBuf,
    /// Fetch pods and claims live from the Kubernetes API
    pub kube: bool,
    /// Namespace scope for orchestrator objects
    pub scope: NamespaceScope,
    /// Bound on each fetch
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("snapshot.yaml"),
            kube: false,
            scope: NamespaceScope::Namespace("default".to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// Source Traits
// =============================================================================

/// Produces the storage cluster's node and volume inventory
#[async_trait]
pub trait StorageSource: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    async fn storage(&self) -> Result<StorageInventory>;
}

/// Produces the orchestrator's pods and claims
#[async_trait]
pub trait WorkloadSource: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    async fn workloads(&self, scope: &NamespaceScope) -> Result<Workloads>;
}

// =============================================================================
// Fetch
// =============================================================================

/// Fetch both halves concurrently and assemble a snapshot
pub async fn fetch_snapshot(
    storage: &dyn StorageSource,
    workloads: &dyn WorkloadSource,
    scope: &NamespaceScope,
    timeout: Duration,
) -> Result<Snapshot> {
    info!(
        storage = storage.name(),
        workloads = workloads.name(),
        %scope,
        "Fetching inventories"
    );

    let (storage_inventory, workload_inventory) = futures::future::try_join(
        bounded(storage.name(), timeout, storage.storage()),
        bounded(workloads.name(), timeout, workloads.workloads(scope)),
    )
    .await?;

    Ok(Snapshot::assemble(storage_inventory, workload_inventory))
}

/// Load the snapshot described by the config
pub async fn load_snapshot(config: &SourceConfig) -> Result<Snapshot> {
    let snapshot_file = FileSource::new(&config.snapshot_path);
    if !config.kube {
        let name = StorageSource::name(&snapshot_file);
        let mut snapshot = bounded(name, config.timeout, snapshot_file.load()).await?;
        file::scope_workloads(&mut snapshot.pods, &mut snapshot.claims, &config.scope);
        return Ok(snapshot);
    }

    let cluster = bounded("kubernetes client", config.timeout, KubeSource::connect()).await?;
    fetch_snapshot(&snapshot_file, &cluster, &config.scope, config.timeout).await
}

async fn bounded<T>(
    source_name: &str,
    after: Duration,
    fetch: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(after, fetch)
        .await
        .map_err(|_| Error::Timeout {
            source_name: source_name.to_string(),
            after,
        })?
}
