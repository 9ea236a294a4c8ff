//! In-memory collaborators for engine tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::Reconciler;
use crate::modules::collaborators::{ConfigSink, ReloadStatus, Reloader, ServiceRegistry};
use jkworkers_types::{PersistError, RegistryError, ReloadError, ServiceEntry, Snapshot};

pub const TAG: &str = "tomcat-service";

pub fn tagged(name: &str, id: &str) -> ServiceEntry {
    ServiceEntry::new(name, id).with_tag(TAG)
}

#[derive(Default)]
pub struct StaticRegistry {
    snapshot: Mutex<Snapshot>,
    failure: Mutex<Option<(usize, RegistryError)>>,
    calls: AtomicUsize,
}

impl StaticRegistry {
    pub fn set(&self, snapshot: Snapshot) {
        *self.snapshot.lock() = snapshot;
    }

    pub fn fail_with(&self, err: RegistryError) {
        self.fail_after(0, err);
    }

    /// Succeed for the first `calls` fetches, then fail.
    pub fn fail_after(&self, calls: usize, err: RegistryError) {
        *self.failure.lock() = Some((calls, err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceRegistry for StaticRegistry {
    async fn list_services(&self) -> Result<Snapshot, RegistryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((after, err)) = self.failure.lock().clone() {
            if call >= after {
                return Err(err);
            }
        }
        Ok(self.snapshot.lock().clone())
    }
}

#[derive(Default)]
pub struct MemorySink {
    writes: Mutex<Vec<String>>,
    failure: Mutex<Option<PersistError>>,
}

impl MemorySink {
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    pub fn fail_with(&self, err: PersistError) {
        *self.failure.lock() = Some(err);
    }
}

#[async_trait]
impl ConfigSink for MemorySink {
    async fn persist(&self, text: &str) -> Result<(), PersistError> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingReloader {
    count: AtomicUsize,
    failure: Mutex<Option<ReloadError>>,
}

impl CountingReloader {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, err: ReloadError) {
        *self.failure.lock() = Some(err);
    }
}

#[async_trait]
impl Reloader for CountingReloader {
    async fn reload(&self) -> Result<ReloadStatus, ReloadError> {
        if let Some(err) = self.failure.lock().clone() {
            return Err(err);
        }
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(ReloadStatus { exit_code: Some(0) })
    }
}

/// Collects formatted log output for assertions on what gets logged.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    /// Route INFO and above on this thread into the buffer until the guard drops.
    pub fn capture_info(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub registry: Arc<StaticRegistry>,
    pub sink: Arc<MemorySink>,
    pub reloader: Arc<CountingReloader>,
}

impl Harness {
    pub fn new(snapshot: Snapshot) -> Self {
        let registry = Arc::new(StaticRegistry::default());
        registry.set(snapshot);
        Self {
            registry,
            sink: Arc::new(MemorySink::default()),
            reloader: Arc::new(CountingReloader::default()),
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.registry.clone(), self.sink.clone(), self.reloader.clone(), TAG)
    }
}
