//! Notification records, sink traits and the bus that fans them out.
//! Sinks run synchronously inside the emitting call, so a record is observed
//! only after the state change it describes has been applied.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use crate::identity::{ComponentId, PoolId, Principal};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    AllowListUpdated { principal: Principal, allowed: bool },
    TermsOfServiceUpdated { terms: String },
    AcceptedTermsOfService { principal: Principal },
    PausedUpdated { paused: bool },
    PoolCreated { pool: PoolId },
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub source: ComponentId,
    pub event: Event,
    pub ts_ms: i64,
}

/// Receives every record on the emitting thread, while the emitting call still
/// holds the configuration's serialization guard.
pub trait EventSink: Send + Sync {
    fn on_event(&self, record: &EventRecord);
}

#[derive(Default)]
pub struct EventBus {
    sinks: RwLock<Vec<Arc<dyn EventSink>>>,
}

impl EventBus {
    pub fn register(&self, sink: Arc<dyn EventSink>) {
        self.sinks.write().push(sink);
    }

    pub fn emit(&self, source: &ComponentId, event: Event) {
        let record = EventRecord { source: *source, event, ts_ms: chrono::Utc::now().timestamp_millis() };
        // Snapshot so a sink may emit or register without holding the read guard
        let sinks: Vec<Arc<dyn EventSink>> = self.sinks.read().clone();
        for sink in &sinks {
            // Best-effort; sinks must not panic
            sink.on_event(&record);
        }
    }
}

/// Keeps every record in memory; the test and replay harnesses assert on it.
#[derive(Default)]
pub struct MemoryRecorder {
    records: Mutex<Vec<EventRecord>>,
}

impl MemoryRecorder {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn records(&self) -> Vec<EventRecord> { self.records.lock().clone() }

    /// Events emitted by one component, in emission order.
    pub fn events_from(&self, source: &ComponentId) -> Vec<Event> {
        self.records.lock().iter().filter(|r| &r.source == source).map(|r| r.event.clone()).collect()
    }

    pub fn len(&self) -> usize { self.records.lock().len() }

    pub fn is_empty(&self) -> bool { self.records.lock().is_empty() }

    pub fn clear(&self) { self.records.lock().clear(); }
}

impl EventSink for MemoryRecorder {
    fn on_event(&self, record: &EventRecord) {
        self.records.lock().push(record.clone());
    }
}

// --- Simple file logger sink for audit events ---

pub struct FileLogger { path: PathBuf }

impl FileLogger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self { Self { path: path.as_ref().to_path_buf() } }
}

impl EventSink for FileLogger {
    fn on_event(&self, record: &EventRecord) {
        // One compact JSON object per line
        let line = match serde_json::to_string(record) {
            Ok(s) => s,
            Err(e) => { warn!(target: "poolgate::events", "audit encode failed: {}", e); return; }
        };
        let res = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(&mut f, "{}", line));
        if let Err(e) = res {
            warn!(target: "poolgate::events", "audit write to '{}' failed: {}", self.path.display(), e);
        }
    }
}
