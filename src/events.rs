//! Structured trace events emitted during analysis.
//!
//! Analyzers report progress to a caller-supplied sink instead of writing
//! directly to a global logger, so callers (and tests) can observe the scan
//! without capturing console output. Events are advisory: no analyzer
//! decision ever depends on a sink's behavior.

use std::sync::Mutex;

/// One observable step of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A qualifying manifest/lock pair was located.
    PairDiscovered {
        directory: String,
        manifest: String,
        lock: String,
    },
    /// A graph build is starting for the pair rooted at `manifest_path`.
    ParseAttempted { manifest_path: String },
    /// The graph build succeeded with `package_count` packages.
    ParseSucceeded {
        manifest_path: String,
        package_count: usize,
    },
    /// The graph build failed; the pair was skipped.
    ParseFailed {
        manifest_path: String,
        reason: String,
    },
}

/// Receiver for [`ScanEvent`]s. Implementations must be `Sync` because
/// analyzers emit from parallel workers.
pub trait EventSink: Sync {
    fn emit(&self, event: ScanEvent);
}

/// Sink that drops every event. The default when a caller has no use for
/// traces.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ScanEvent) {}
}

/// Sink that forwards events to the `log` facade at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ScanEvent) {
        match event {
            ScanEvent::PairDiscovered {
                directory,
                manifest,
                lock,
            } => log::debug!("found pair in {}: {} + {}", directory, manifest, lock),
            ScanEvent::ParseAttempted { manifest_path } => {
                log::debug!("building graph for {}", manifest_path)
            }
            ScanEvent::ParseSucceeded {
                manifest_path,
                package_count,
            } => log::debug!("built graph for {} ({} packages)", manifest_path, package_count),
            ScanEvent::ParseFailed {
                manifest_path,
                reason,
            } => log::debug!("skipped {}: {}", manifest_path, reason),
        }
    }
}

/// Sink that records every event for later inspection. Used by tests and by
/// callers that post-process traces.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<ScanEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out the events observed so far, in emission order per worker.
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count_matching(&self, predicate: impl Fn(&ScanEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: ScanEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
