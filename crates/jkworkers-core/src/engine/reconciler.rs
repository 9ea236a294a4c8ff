//! One reconciliation pass: fetch → group → render → persist → reload.

use std::sync::Arc;
use tracing::Instrument;

use super::{group, render, ConfigDocument, PassRequest};
use crate::modules::collaborators::{ConfigSink, ReloadStatus, Reloader, ServiceRegistry};
use jkworkers_types::SyncError;

/// Result of a pass that wrote a new document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub clusters: usize,
    pub workers: usize,
    /// Members left out because their id could not be parsed
    pub skipped: Vec<SyncError>,
    /// `None` when the request did not ask for a reload
    pub reload: Option<ReloadStatus>,
}

/// Runs passes against a fixed set of collaborators.
///
/// A failed fetch leaves the stored document untouched; a failed write or
/// reload is reported and left for the next trigger to retry.
pub struct Reconciler {
    registry: Arc<dyn ServiceRegistry>,
    sink: Arc<dyn ConfigSink>,
    reloader: Arc<dyn Reloader>,
    membership_tag: String,
}

impl Reconciler {
    pub fn new(
        registry: Arc<dyn ServiceRegistry>,
        sink: Arc<dyn ConfigSink>,
        reloader: Arc<dyn Reloader>,
        membership_tag: impl Into<String>,
    ) -> Self {
        Self { registry, sink, reloader, membership_tag: membership_tag.into() }
    }

    /// Fetch, group and render without writing anything.
    pub async fn render_current(&self) -> Result<ConfigDocument, SyncError> {
        let snapshot = self.registry.list_services().await.map_err(|e| {
            tracing::error!("❌ Registry unavailable, keeping current workers file: {}", e);
            e
        })?;
        let membership = group(snapshot, &self.membership_tag);
        Ok(render(&membership))
    }

    pub async fn run_pass(&self, request: PassRequest) -> Result<PassOutcome, SyncError> {
        let span = tracing::info_span!("reconcile", trigger = %request.reason);
        self.run_pass_inner(request).instrument(span).await
    }

    async fn run_pass_inner(&self, request: PassRequest) -> Result<PassOutcome, SyncError> {
        tracing::info!("🔄 Reconciling workers (reload: {})", request.reload);

        let document = self.render_current().await?;

        self.sink.persist(document.as_str()).await.map_err(|e| {
            tracing::error!("❌ Could not write workers file: {}", e);
            e
        })?;
        tracing::info!(
            "📝 Workers file written: {} clusters, {} workers, {} skipped",
            document.cluster_count(),
            document.worker_count(),
            document.skipped().len()
        );

        let reload = if request.reload {
            let status = self.reloader.reload().await.map_err(|e| {
                tracing::error!("❌ Reload failed, proxy may serve the previous config: {}", e);
                e
            })?;
            Some(status)
        } else {
            None
        };

        Ok(PassOutcome {
            clusters: document.cluster_count(),
            workers: document.worker_count(),
            skipped: document.skipped().to_vec(),
            reload,
        })
    }
}
