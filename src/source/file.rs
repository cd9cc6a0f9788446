//! Snapshot File Source
//!
//! Reads a previously captured inventory from a JSON or YAML file.

use super::{NamespaceScope, StorageSource, WorkloadSource};
use crate::error::Result;
use crate::model::{Claim, Pod, Snapshot, StorageInventory, Workloads};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Encoding of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.json` is JSON, anything else is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }

    pub fn parse(&self, contents: &str) -> Result<Snapshot> {
        Ok(match self {
            SnapshotFormat::Json => serde_json::from_str(contents)?,
            SnapshotFormat::Yaml => serde_yaml::from_str(contents)?,
        })
    }
}

/// Snapshot stored on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("snapshot file {}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the whole snapshot
    pub async fn load(&self) -> Result<Snapshot> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let snapshot = SnapshotFormat::from_path(&self.path).parse(&contents)?;
        debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            volumes = snapshot.volumes.len(),
            pods = snapshot.pods.len(),
            claims = snapshot.claims.len(),
            "Loaded snapshot file"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl StorageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn storage(&self) -> Result<StorageInventory> {
        Ok(self.load().await?.storage())
    }
}

#[async_trait]
impl WorkloadSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn workloads(&self, scope: &NamespaceScope) -> Result<Workloads> {
        let mut workloads = self.load().await?.workloads();
        scope_workloads(&mut workloads.pods, &mut workloads.claims, scope);
        Ok(workloads)
    }
}

/// Drop pods and claims outside the namespace scope
pub fn scope_workloads(pods: &mut Vec<Pod>, claims: &mut Vec<Claim>, scope: &NamespaceScope) {
    pods.retain(|pod| scope.contains(&pod.namespace));
    claims.retain(|claim| scope.contains(&claim.namespace));
}
