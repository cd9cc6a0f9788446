//! Volume Set
//!
//! Ordered view over the enumerated storage volumes with name and id lookup.

use super::identifier::{select_identified, Selection};
use crate::model::Volume;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Volumes of one snapshot, in input order
#[derive(Debug, Clone, Default)]
pub struct VolumeSet {
    volumes: IndexMap<String, Volume>,
    by_name: HashMap<String, usize>,
}

impl VolumeSet {
    pub fn new(volumes: impl IntoIterator<Item = Volume>) -> Self {
        let mut by_id: IndexMap<String, Volume> = IndexMap::new();
        for volume in volumes {
            if let Some(previous) = by_id.insert(volume.id.clone(), volume) {
                warn!(volume_id = %previous.id, "Duplicate volume id in inventory, keeping last");
            }
        }

        let by_name = by_id
            .values()
            .enumerate()
            .filter(|(_, volume)| !volume.name.is_empty())
            .map(|(pos, volume)| (volume.name.clone(), pos))
            .collect();

        debug!(volumes = by_id.len(), "Built volume set");

        Self {
            volumes: by_id,
            by_name,
        }
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// All volumes in input order
    pub fn all(&self) -> impl Iterator<Item = &Volume> + '_ {
        self.volumes.values()
    }

    pub fn by_name(&self, name: &str) -> Option<&Volume> {
        self.by_name
            .get(name)
            .and_then(|&pos| self.volumes.get_index(pos))
            .map(|(_, volume)| volume)
    }

    pub fn by_id(&self, id: &str) -> Option<&Volume> {
        self.volumes.get(id)
    }

    /// Resolve by id first, then by name
    pub fn lookup(&self, identifier: &str) -> Option<&Volume> {
        self.by_id(identifier).or_else(|| self.by_name(identifier))
    }

    /// Filter volumes by id or name
    pub fn select(&self, identifiers: &[String]) -> Selection<&Volume> {
        select_identified(self.all(), identifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volumes() -> VolumeSet {
        VolumeSet::new(vec![
            Volume::new("3", "tp3"),
            Volume::new("1", "tp1"),
            Volume::new("2", "tp2"),
        ])
    }

    #[test]
    fn test_all_preserves_input_order() {
        let set = volumes();
        let names: Vec<_> = set.all().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["tp3", "tp1", "tp2"]);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let set = volumes();
        assert_eq!(set.by_name("tp1").unwrap().id, "1");
        assert_eq!(set.by_id("2").unwrap().name, "tp2");
        assert!(set.by_name("1").is_none());
        assert!(set.by_id("tp1").is_none());
        assert_eq!(set.lookup("tp3").unwrap().id, "3");
        assert_eq!(set.lookup("3").unwrap().name, "tp3");
        assert!(set.lookup("missing").is_none());
    }

    #[test]
    fn test_select_volumes() {
        let set = volumes();
        let ids = vec!["2".to_string(), "tp3".to_string()];
        let selection = set.select(&ids);
        assert!(selection.is_complete());
        let names: Vec<_> = selection.items().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["tp3", "tp2"]);
    }
}
