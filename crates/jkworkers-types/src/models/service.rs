//! Registry records and their grouping into clusters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One service registered in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Logical service name, which is also the cluster name
    pub name: String,
    /// Structured instance id, see [`crate::ServiceId`]
    pub id: String,
    /// Address the service registered with
    pub address: String,
    /// Port the service registered with (rendering uses the id-derived port)
    pub port: u16,
    /// Registry tags
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            address: String::new(),
            port: 0,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>, port: u16) -> Self {
        self.address = address.into();
        self.port = port;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Every registered service at one point in time.
///
/// Treated as ground truth for a single pass and never compared with an
/// earlier snapshot.
pub type Snapshot = Vec<ServiceEntry>;

/// Qualifying services keyed by cluster name.
///
/// Cluster names iterate in lexicographic order; members keep the order in
/// which they were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterMembership {
    clusters: BTreeMap<String, Vec<ServiceEntry>>,
}

impl ClusterMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to the cluster named after it.
    pub fn insert(&mut self, entry: ServiceEntry) {
        self.clusters.entry(entry.name.clone()).or_default().push(entry);
    }

    pub fn cluster_names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(String::as_str)
    }

    pub fn clusters(&self) -> impl Iterator<Item = (&str, &[ServiceEntry])> {
        self.clusters.iter().map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn members(&self, cluster: &str) -> Option<&[ServiceEntry]> {
        self.clusters.get(cluster).map(Vec::as_slice)
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn member_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
