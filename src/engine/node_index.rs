//! Node Index
//!
//! Read-only index over the storage cluster's node inventory. Nodes are keyed
//! by identifier (deduplicated, last write wins) with secondary indexes on
//! hostname, management IP and scheduler node name.

use super::identifier::{select_identified, Selection};
use crate::model::Node;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Index over a node inventory snapshot
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    /// Nodes keyed by id, in first-seen order
    nodes: IndexMap<String, Node>,
    by_hostname: HashMap<String, usize>,
    by_mgmt_ip: HashMap<String, usize>,
    by_scheduler_name: HashMap<String, usize>,
}

impl NodeIndex {
    /// Build the index
    pub fn new(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut by_id: IndexMap<String, Node> = IndexMap::new();
        for node in nodes {
            if let Some(previous) = by_id.insert(node.id.clone(), node) {
                warn!(node_id = %previous.id, "Duplicate node id in inventory, keeping last");
            }
        }

        let mut by_hostname = HashMap::new();
        let mut by_mgmt_ip = HashMap::new();
        let mut by_scheduler_name = HashMap::new();

        for (pos, node) in by_id.values().enumerate() {
            insert_key(&mut by_hostname, &node.hostname, pos);
            insert_key(&mut by_mgmt_ip, &node.mgmt_ip, pos);
            insert_key(&mut by_scheduler_name, &node.scheduler_node_name, pos);
        }

        debug!(nodes = by_id.len(), "Built node index");

        Self {
            nodes: by_id,
            by_hostname,
            by_mgmt_ip,
            by_scheduler_name,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in input order
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Resolve a node by identifier only
    pub fn by_id(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Resolve a node by identifier, then hostname, then management IP, then
    /// scheduler node name
    pub fn lookup(&self, key: &str) -> Option<&Node> {
        if key.is_empty() {
            return None;
        }
        self.by_id(key)
            .or_else(|| self.by_position(self.by_hostname.get(key)))
            .or_else(|| self.by_position(self.by_mgmt_ip.get(key)))
            .or_else(|| self.by_position(self.by_scheduler_name.get(key)))
    }

    /// (used, total) bytes over all of a node's pools
    pub fn aggregate_capacity(node: &Node) -> (u64, u64) {
        node.capacity()
    }

    /// (used, total) bytes over the whole cluster
    pub fn cluster_capacity(&self) -> (u64, u64) {
        self.iter().map(Self::aggregate_capacity).fold(
            (0u64, 0u64),
            |(used, total), (node_used, node_total)| {
                (used.saturating_add(node_used), total.saturating_add(node_total))
            },
        )
    }

    /// Filter nodes by id, hostname, management IP or scheduler node name
    pub fn select(&self, identifiers: &[String]) -> Selection<&Node> {
        select_identified(self.iter(), identifiers)
    }

    fn by_position(&self, pos: Option<&usize>) -> Option<&Node> {
        pos.and_then(|&pos| self.nodes.get_index(pos)).map(|(_, node)| node)
    }
}

fn insert_key(index: &mut HashMap<String, usize>, key: &str, pos: usize) {
    if !key.is_empty() {
        index.insert(key.to_string(), pos);
    }
}
