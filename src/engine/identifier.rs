//! Identifier Matching
//!
//! Operators refer to resources interchangeably by display name, internal ID
//! or the host they live on. Each entity exposes the fields it can be matched
//! on as typed [`LookupKey`]s, and [`select`] filters a list of entities
//! against caller-supplied identifiers with exact, substring-free matching.

use crate::error::{Error, Result};
use crate::model::{Node, Volume};

// =============================================================================
// Lookup Key
// =============================================================================

/// One matchable field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    /// Node identifier
    Id(&'a str),
    /// Node hostname
    Hostname(&'a str),
    /// Node management IP
    MgmtIp(&'a str),
    /// Orchestrator scheduler node name
    SchedulerName(&'a str),
    /// Claim name
    ClaimName(&'a str),
    /// Volume display name
    VolumeName(&'a str),
    /// Volume internal identifier
    VolumeId(&'a str),
    /// Hostname a volume is attached on
    AttachedHost(&'a str),
}

impl<'a> LookupKey<'a> {
    /// The field value
    pub fn value(&self) -> &'a str {
        match *self {
            LookupKey::Id(v)
            | LookupKey::Hostname(v)
            | LookupKey::MgmtIp(v)
            | LookupKey::SchedulerName(v)
            | LookupKey::ClaimName(v)
            | LookupKey::VolumeName(v)
            | LookupKey::VolumeId(v)
            | LookupKey::AttachedHost(v) => v,
        }
    }

    /// Exact match; empty fields never match
    #[inline]
    pub fn matches(&self, identifier: &str) -> bool {
        let value = self.value();
        !value.is_empty() && value == identifier
    }
}

/// Entities that can be picked out by operator-supplied identifiers
pub trait Identified {
    fn lookup_keys(&self) -> Vec<LookupKey<'_>>;

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.lookup_keys().iter().any(|key| key.matches(identifier))
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn lookup_keys(&self) -> Vec<LookupKey<'_>> {
        (**self).lookup_keys()
    }
}

impl Identified for Node {
    fn lookup_keys(&self) -> Vec<LookupKey<'_>> {
        vec![
            LookupKey::Id(&self.id),
            LookupKey::Hostname(&self.hostname),
            LookupKey::MgmtIp(&self.mgmt_ip),
            LookupKey::SchedulerName(&self.scheduler_node_name),
        ]
    }
}

impl Identified for Volume {
    fn lookup_keys(&self) -> Vec<LookupKey<'_>> {
        vec![LookupKey::VolumeId(&self.id), LookupKey::VolumeName(&self.name)]
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Result of filtering by identifiers: whatever matched, plus the identifiers
/// that matched nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<T> {
    items: Vec<T>,
    unmatched: Vec<String>,
}

impl<T> Selection<T> {
    /// Matched items in input order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Identifiers that matched nothing, in request order
    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Every requested identifier matched something
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// `NoMatch` naming the first unmatched identifier
    pub fn error(&self) -> Option<Error> {
        self.unmatched.first().map(|identifier| Error::NoMatch {
            identifier: identifier.clone(),
        })
    }

    /// Split into the matched items and the `NoMatch` error, if any
    pub fn into_parts(self) -> (Vec<T>, Option<Error>) {
        let error = self.error();
        (self.items, error)
    }

    /// Treat any unmatched identifier as fatal
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.error() {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Selection<U> {
        Selection {
            items: self.items.into_iter().map(f).collect(),
            unmatched: self.unmatched,
        }
    }
}

/// Keep the items matching any identifier. An empty identifier list keeps
/// everything.
pub fn select<T>(
    items: impl IntoIterator<Item = T>,
    identifiers: &[String],
    mut matches: impl FnMut(&T, &str) -> bool,
) -> Selection<T> {
    if identifiers.is_empty() {
        return Selection {
            items: items.into_iter().collect(),
            unmatched: Vec::new(),
        };
    }

    let mut found = vec![false; identifiers.len()];
    let mut selected = Vec::new();

    for item in items {
        let mut keep = false;
        for (idx, identifier) in identifiers.iter().enumerate() {
            if matches(&item, identifier.as_str()) {
                found[idx] = true;
                keep = true;
            }
        }
        if keep {
            selected.push(item);
        }
    }

    let unmatched = identifiers
        .iter()
        .zip(found)
        .filter(|(_, hit)| !hit)
        .map(|(identifier, _)| identifier.clone())
        .collect();

    Selection {
        items: selected,
        unmatched,
    }
}

/// [`select`] over [`Identified`] entities
pub fn select_identified<T: Identified>(
    items: impl IntoIterator<Item = T>,
    identifiers: &[String],
) -> Selection<T> {
    select(items, identifiers, |item, identifier| {
        item.matches_identifier(identifier)
    })
}
