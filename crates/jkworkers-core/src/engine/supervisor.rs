//! Event-driven scheduling of reconciliation passes.
//!
//! One worker task drains the [`PassQueue`]; event handling only decides
//! whether, when and with which reload flag a pass is requested. `start`
//! events wait out the grace delay in their own task, so the event stream
//! keeps being consumed meanwhile. Passes never overlap.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_stream::{Stream, StreamExt};

use super::{PassQueue, PassRequest, Reconciler, TriggerReason};
use jkworkers_types::{
    EventSourceError, LifecycleEvent, LifecycleStatus, ReloadPolicy, SupervisorConfig, SyncError,
};

/// What to do with one lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    /// Request a pass, after `delay` if set
    Reconcile { request: PassRequest, delay: Option<Duration> },
    Ignore,
}

pub struct Supervisor {
    reconciler: Arc<Reconciler>,
    queue: Arc<PassQueue>,
    policy: ReloadPolicy,
    start_grace: Duration,
}

impl Supervisor {
    pub fn new(reconciler: Reconciler, policy: ReloadPolicy, start_grace: Duration) -> Self {
        Self {
            reconciler: Arc::new(reconciler),
            queue: Arc::new(PassQueue::new()),
            policy,
            start_grace,
        }
    }

    pub fn from_config(reconciler: Reconciler, config: &SupervisorConfig) -> Self {
        Self::new(reconciler, config.reload_policy, config.start_grace())
    }

    /// Map an event to the pass it should request.
    pub fn action_for(&self, event: &LifecycleEvent) -> EventAction {
        let status = event.kind();
        let Some(reload) = self.policy.reload_after(&status) else {
            return EventAction::Ignore;
        };

        let (reason, delay) = match status {
            LifecycleStatus::Start => {
                (TriggerReason::Start, Some(self.start_grace).filter(|d| !d.is_zero()))
            }
            LifecycleStatus::Die => (TriggerReason::Die, None),
            LifecycleStatus::Stop => (TriggerReason::Stop, None),
            LifecycleStatus::Kill => (TriggerReason::Kill, None),
            LifecycleStatus::Other(_) => return EventAction::Ignore,
        };

        EventAction::Reconcile { request: PassRequest::new(reason, reload), delay }
    }

    /// Run the startup pass, then react to `events` until the stream ends.
    ///
    /// A registry failure on the startup pass is returned immediately. Once
    /// the stream ends or fails, delayed requests are still submitted and the
    /// pending pass is run before returning; the stream ending is reported
    /// as [`EventSourceError::Closed`].
    pub async fn run<S>(self, events: S) -> Result<(), SyncError>
    where
        S: Stream<Item = Result<LifecycleEvent, EventSourceError>> + Send + Unpin,
    {
        self.startup().await?;

        let worker = {
            let queue = self.queue.clone();
            let reconciler = self.reconciler.clone();
            tokio::spawn(async move {
                while let Some(request) = queue.next().await {
                    // Failures are logged by the reconciler; the next trigger retries.
                    let _ = reconciler.run_pass(request).await;
                }
            })
        };

        tracing::info!("👂 Listening for container events...");
        let mut delayed = JoinSet::new();
        let end = self.consume(events, &mut delayed).await;

        while delayed.join_next().await.is_some() {}
        self.queue.close();
        if let Err(e) = worker.await {
            tracing::error!("❌ Reconcile worker panicked: {}", e);
        }

        Err(end.into())
    }

    async fn startup(&self) -> Result<(), SyncError> {
        let request = PassRequest::new(TriggerReason::Startup, self.policy.on_startup);
        match self.reconciler.run_pass(request).await {
            Ok(outcome) => {
                tracing::info!(
                    "✅ Startup pass complete: {} clusters, {} workers",
                    outcome.clusters,
                    outcome.workers
                );
                Ok(())
            }
            Err(e @ SyncError::RegistryUnavailable(_)) => Err(e),
            Err(e) => {
                tracing::warn!("⚠️ Startup pass incomplete, continuing: {}", e);
                Ok(())
            }
        }
    }

    async fn consume<S>(&self, mut events: S, delayed: &mut JoinSet<()>) -> EventSourceError
    where
        S: Stream<Item = Result<LifecycleEvent, EventSourceError>> + Send + Unpin,
    {
        while let Some(item) = events.next().await {
            let event = match item {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("❌ Event stream failed: {}", e);
                    return e;
                }
            };

            match self.action_for(&event) {
                EventAction::Ignore => {
                    tracing::info!(
                        "🙈 Ignoring '{}' event for container {}",
                        event.status,
                        event.short_id()
                    );
                }
                EventAction::Reconcile { request, delay: Some(delay) } => {
                    tracing::info!(
                        "⏳ '{}' event for container {}, reconciling in {:?}",
                        event.status,
                        event.short_id(),
                        delay
                    );
                    let queue = self.queue.clone();
                    delayed.spawn(async move {
                        tokio::time::sleep(delay).await;
                        queue.submit(request);
                    });
                }
                EventAction::Reconcile { request, delay: None } => {
                    tracing::info!(
                        "📦 '{}' event for container {}, reconciling",
                        event.status,
                        event.short_id()
                    );
                    if self.queue.submit(request) {
                        tracing::debug!("Merged into the pending pass");
                    }
                }
            }

            while delayed.try_join_next().is_some() {}
        }

        tracing::error!("❌ Event stream closed");
        EventSourceError::Closed
    }
}
