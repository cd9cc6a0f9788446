//! Resource Correlation Engine
//!
//! Read-only views over one snapshot, leaves first:
//! - [`NodeIndex`]: node lookup by id, hostname, management IP, scheduler name
//! - [`VolumeSet`]: ordered volumes with name/id lookup
//! - [`PodIndex`]: claim name → pods and containers
//! - [`ReplicationResolver`]: attachment state and replica topology
//! - [`ClaimCorrelator`]: claims joined with volumes and pods
//!
//! [`ClusterView`] owns the indexes built from a [`crate::model::Snapshot`]
//! and hands out the borrowed resolver and correlator.

pub mod correlator;
pub mod identifier;
pub mod node_index;
pub mod pod_index;
pub mod replication;
pub mod view;
pub mod volume_set;

pub use correlator::*;
pub use identifier::*;
pub use node_index::*;
pub use pod_index::*;
pub use replication::*;
pub use view::*;
pub use volume_set::*;
