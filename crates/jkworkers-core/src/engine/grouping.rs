use jkworkers_types::{ClusterMembership, Snapshot};

/// Group the services carrying `membership_tag` by service name.
///
/// Entries keep snapshot order inside their cluster. Entries sharing an id
/// are all kept.
pub fn group(snapshot: Snapshot, membership_tag: &str) -> ClusterMembership {
    let total = snapshot.len();
    let mut membership = ClusterMembership::new();

    for entry in snapshot.into_iter().filter(|e| e.has_tag(membership_tag)) {
        membership.insert(entry);
    }

    tracing::debug!(
        "Grouped {} of {} services tagged '{}' into {} clusters",
        membership.member_count(),
        total,
        membership_tag,
        membership.cluster_count()
    );
    membership
}
