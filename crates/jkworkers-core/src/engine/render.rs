//! `workers.properties` rendering.
//!
//! Layout, top to bottom:
//!
//! ```text
//! worker.list=jkstatus,cluster_<name>...
//!
//! worker.cluster_<name>.type=lb                      (per cluster)
//! worker.cluster_<name>.error_escalation_time=0
//! worker.cluster_<name>.balance_workers=<key>,<key>
//!
//! worker.<key>.host=<host>                           (per member)
//! worker.<key>.port=<port>
//! worker.<key>.reference=worker.template_ajp13
//! worker.template_ajp13.*                            (fixed trailer)
//! worker.jkstatus.type=status
//! ```

use std::fmt;

use jkworkers_types::{ClusterMembership, ServiceId, SyncError};

/// Worker template every instance references, plus the status worker.
pub const WORKER_TEMPLATE: &str = "\
worker.template_ajp13.type=ajp13
worker.template_ajp13.connection_pool_timeout=300
worker.template_ajp13.connection_pool_minsize=0
worker.template_ajp13.ping_mode=A
worker.template_ajp13.ping_timeout=10000
worker.template_ajp13.lbfactor=10
worker.template_ajp13.activation=A
worker.template_ajp13.recovery_options=7
worker.template_ajp13.retries=2
worker.template_ajp13.method=Session
worker.template_ajp13.socket_connect_timeout=10000
worker.jkstatus.type=status
";

const STATUS_WORKER: &str = "jkstatus";
const TEMPLATE_WORKER: &str = "worker.template_ajp13";

/// A rendered document and the members left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    text: String,
    cluster_count: usize,
    worker_count: usize,
    skipped: Vec<SyncError>,
}

impl ConfigDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Number of per-instance blocks written.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Members whose id could not be parsed, as `MalformedServiceId`.
    pub fn skipped(&self) -> &[SyncError] {
        &self.skipped
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render `membership` into the proxy's worker configuration.
///
/// Members with a malformed id are logged, reported through
/// [`ConfigDocument::skipped`] and left out; everything else is rendered.
/// A cluster left with no member is omitted entirely, since mod_jk refuses
/// an lb worker with an empty `balance_workers`.
pub fn render(membership: &ClusterMembership) -> ConfigDocument {
    let mut skipped = Vec::new();
    let mut clusters: Vec<(&str, Vec<ServiceId>)> = Vec::with_capacity(membership.cluster_count());

    for (cluster, members) in membership.clusters() {
        let mut ids = Vec::with_capacity(members.len());
        for entry in members {
            match ServiceId::parse(&entry.id) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping member of cluster '{}': malformed id {}", cluster, e);
                    skipped.push(SyncError::from(e));
                }
            }
        }
        if ids.is_empty() {
            tracing::warn!("⚠️ Cluster '{}' has no renderable member, leaving it out", cluster);
            continue;
        }
        clusters.push((cluster, ids));
    }

    let mut text = format!("worker.list={}", STATUS_WORKER);
    for (cluster, _) in &clusters {
        text.push_str(&format!(",cluster_{}", cluster));
    }
    text.push('\n');

    for (cluster, ids) in &clusters {
        let keys: Vec<&str> = ids.iter().map(|id| id.key.as_str()).collect();
        text.push('\n');
        text.push_str(&format!("worker.cluster_{}.type=lb\n", cluster));
        text.push_str(&format!("worker.cluster_{}.error_escalation_time=0\n", cluster));
        text.push_str(&format!("worker.cluster_{}.balance_workers={}\n", cluster, keys.join(",")));
    }
    text.push('\n');

    let mut worker_count = 0;
    for id in clusters.iter().flat_map(|(_, ids)| ids) {
        text.push_str(&format!("worker.{}.host={}\n", id.key, id.host));
        text.push_str(&format!("worker.{}.port={}\n", id.key, id.port));
        text.push_str(&format!("worker.{}.reference={}\n", id.key, TEMPLATE_WORKER));
        worker_count += 1;
    }

    text.push_str(WORKER_TEMPLATE);

    ConfigDocument { text, cluster_count: clusters.len(), worker_count, skipped }
}
