//! Inventory types consumed by the correlation engine
//!
//! This module contains the already-fetched, already-typed records:
//! - Node: storage cluster member with capacity pools
//! - Volume: storage volume with replica placement
//! - Pod / Claim: orchestrator workloads and persistent volume claims
//! - Snapshot: one invocation's worth of all of the above

pub mod node;
pub mod orchestrator;
pub mod snapshot;
pub mod volume;

pub use node::*;
pub use orchestrator::*;
pub use snapshot::*;
pub use volume::*;
