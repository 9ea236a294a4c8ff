#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

//! Reconciliation against a mocked Consul agent and a real workers file.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jkworkers_core::{
    AtomicFileSink, ConsulRegistry, PassRequest, Reconciler, ReloadStatus, Reloader, Supervisor,
    TriggerReason, WORKER_TEMPLATE,
};
use jkworkers_types::{
    EventSourceError, LifecycleEvent, ReloadError, ReloadPolicy, SyncError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TAG: &str = "tomcat-service";

#[derive(Default)]
struct CountingReloader {
    count: AtomicUsize,
}

#[async_trait]
impl Reloader for CountingReloader {
    async fn reload(&self) -> Result<ReloadStatus, ReloadError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(ReloadStatus { exit_code: Some(0) })
    }
}

fn app_cluster() -> serde_json::Value {
    serde_json::json!({
        "h1:svc_app_100:1": {
            "ID": "h1:svc_app_100:1",
            "Service": "app",
            "Tags": [TAG],
            "Address": "10.0.0.1",
            "Port": 8009
        },
        "h2:svc_app_200:2": {
            "ID": "h2:svc_app_200:2",
            "Service": "app",
            "Tags": [TAG],
            "Address": "10.0.0.2",
            "Port": 8009
        },
        "h3:redis_cache_300:1": {
            "ID": "h3:redis_cache_300:1",
            "Service": "redis",
            "Tags": ["cache"],
            "Address": "10.0.0.3",
            "Port": 6379
        }
    })
}

fn expected_app_document() -> String {
    format!(
        "worker.list=jkstatus,cluster_app\n\
         \n\
         worker.cluster_app.type=lb\n\
         worker.cluster_app.error_escalation_time=0\n\
         worker.cluster_app.balance_workers=svc_app_100,svc_app_200\n\
         \n\
         worker.svc_app_100.host=h1\n\
         worker.svc_app_100.port=100\n\
         worker.svc_app_100.reference=worker.template_ajp13\n\
         worker.svc_app_200.host=h2\n\
         worker.svc_app_200.port=200\n\
         worker.svc_app_200.reference=worker.template_ajp13\n\
         {}",
        WORKER_TEMPLATE
    )
}

async fn consul_with(status: u16, body: Option<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    let response = match body {
        Some(json) => ResponseTemplate::new(status).set_body_json(json),
        None => ResponseTemplate::new(status).set_body_string("rpc error: No cluster leader"),
    };
    Mock::given(method("GET"))
        .and(path("/v1/agent/services"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn reconciler(
    server: &MockServer,
    sink: AtomicFileSink,
    reloader: Arc<dyn Reloader>,
) -> Reconciler {
    let registry = ConsulRegistry::new(&server.uri()).expect("registry");
    Reconciler::new(Arc::new(registry), Arc::new(sink), reloader, TAG)
}

#[tokio::test]
async fn test_pass_writes_expected_document() {
    let server = consul_with(200, Some(app_cluster())).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("workers.properties");
    let reloader = Arc::new(CountingReloader::default());

    let outcome = reconciler(&server, AtomicFileSink::new(&file), reloader.clone())
        .run_pass(PassRequest::new(TriggerReason::Start, true))
        .await
        .expect("pass");

    assert_eq!(outcome.clusters, 1);
    assert_eq!(outcome.workers, 2);
    assert_eq!(std::fs::read_to_string(&file).expect("workers file"), expected_app_document());
    assert_eq!(reloader.count.load(Ordering::SeqCst), 1);
    assert!(!dir.path().join(".workers.properties.tmp").exists());
}

#[tokio::test]
async fn test_registry_failure_preserves_existing_file() {
    let server = consul_with(500, None).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("workers.properties");
    let fixture = "worker.list=jkstatus,cluster_legacy\n# hand-tuned\n";
    std::fs::write(&file, fixture).expect("fixture");
    let reloader = Arc::new(CountingReloader::default());

    let err = reconciler(&server, AtomicFileSink::new(&file), reloader.clone())
        .run_pass(PassRequest::new(TriggerReason::Start, true))
        .await
        .expect_err("500 must abort the pass");

    assert!(matches!(err, SyncError::RegistryUnavailable(_)), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&file).expect("workers file"), fixture);
    assert_eq!(reloader.count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_supervisor_startup_then_start_event() {
    let server = consul_with(200, Some(app_cluster())).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("workers.properties");
    let reloader = Arc::new(CountingReloader::default());

    let supervisor = Supervisor::new(
        reconciler(&server, AtomicFileSink::new(&file), reloader.clone()),
        ReloadPolicy::default(),
        Duration::ZERO,
    );
    let events = tokio_stream::iter(vec![
        Ok(LifecycleEvent::new("start", "4f2c1a9b8e7d")),
        Ok(LifecycleEvent::new("exec_start: sh", "4f2c1a9b8e7d")),
    ]);

    let result = supervisor.run(events).await;

    assert_eq!(result, Err(SyncError::EventSource(EventSourceError::Closed)));
    assert_eq!(std::fs::read_to_string(&file).expect("workers file"), expected_app_document());
    // startup reload plus the start event
    assert_eq!(reloader.count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_supervisor_stops_when_registry_down_at_startup() {
    let server = consul_with(503, None).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("workers.properties");
    let reloader = Arc::new(CountingReloader::default());

    let supervisor = Supervisor::new(
        reconciler(&server, AtomicFileSink::new(&file), reloader.clone()),
        ReloadPolicy::default(),
        Duration::ZERO,
    );
    let events = tokio_stream::iter(Vec::<Result<LifecycleEvent, EventSourceError>>::new());

    let err = supervisor.run(events).await.expect_err("startup must fail");

    assert!(matches!(err, SyncError::RegistryUnavailable(_)), "got {err:?}");
    assert!(!file.exists());
    assert_eq!(reloader.count.load(Ordering::SeqCst), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_missing_reload_command_keeps_written_file() {
    use jkworkers_core::CommandReloader;

    let server = consul_with(200, Some(app_cluster())).await;
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("workers.properties");
    let reloader = Arc::new(CommandReloader::new(dir.path().join("no-such-restart.sh")));

    let err = reconciler(&server, AtomicFileSink::new(&file), reloader)
        .run_pass(PassRequest::new(TriggerReason::Start, true))
        .await
        .expect_err("missing command must fail");

    assert!(matches!(err, SyncError::ReloadFailure(_)), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&file).expect("workers file"), expected_app_document());
}
