//! Build Event Port
//!
//! Observable progress for stage, assemble and launch. Enables console
//! progress, NDJSON event streams for CI, and test recording.

use std::path::PathBuf;

use crate::domain::value_objects::PackageName;

/// Where a staged package came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageSource {
    Cache,
    Index,
}

impl PackageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageSource::Cache => "cache",
            PackageSource::Index => "index",
        }
    }
}

/// Event emitted during a build or launch
#[derive(Debug, Clone)]
pub enum BuildEvent {
    /// Dependency staging started
    StageStarted { lock: PathBuf, package_count: usize },

    /// A locked package was resolved and verified
    PackageResolved {
        name: PackageName,
        version: String,
        source: PackageSource,
    },

    /// A package's files were installed into the staging area
    PackageInstalled {
        name: PackageName,
        version: String,
        file_count: usize,
    },

    /// Installed set published
    StageCompleted {
        stage_dir: PathBuf,
        package_count: usize,
        file_count: usize,
    },

    /// Image assembly started
    AssembleStarted { image_dir: PathBuf },

    /// A tooling package was left out of the image
    ToolingExcluded { name: PackageName },

    /// Image published
    AssembleCompleted {
        image_dir: PathBuf,
        package_count: usize,
        source_file_count: usize,
    },

    /// Entry point process spawned
    ProcessStarted {
        pid: u32,
        module: String,
        port: u16,
    },

    /// Entry point accepted a connection on its port
    ProcessReady { port: u16 },

    /// Entry point exited
    ProcessExited { code: Option<i32> },
}

/// Trait for receiving build events
pub trait BuildEventSink: Send + Sync {
    fn on_event(&self, event: BuildEvent);

    /// Whether per-package events are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }

    /// Push buffered output to its destination. Called before handing the
    /// terminal to a child process.
    fn flush(&self) {}
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Sink that records every event, for asserting on emitted sequences
    #[derive(Clone, Default)]
    pub struct RecordingEventSink {
        pub events: Arc<Mutex<Vec<BuildEvent>>>,
        /// Number of events recorded at each flush
        pub flushes: Arc<Mutex<Vec<usize>>>,
    }

    impl RecordingEventSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn take(&self) -> Vec<BuildEvent> {
            std::mem::take(&mut *self.events.lock().unwrap())
        }

        pub fn flush_points(&self) -> Vec<usize> {
            self.flushes.lock().unwrap().clone()
        }
    }

    impl BuildEventSink for RecordingEventSink {
        fn on_event(&self, event: BuildEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn flush(&self) {
            let seen = self.events.lock().unwrap().len();
            self.flushes.lock().unwrap().push(seen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingEventSink;
    use super::*;

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingEventSink::new();
        sink.on_event(BuildEvent::ProcessReady { port: 8000 });
        sink.on_event(BuildEvent::ProcessExited { code: Some(0) });

        let events = sink.take();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BuildEvent::ProcessReady { port: 8000 }));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }

    #[test]
    fn package_source_labels() {
        assert_eq!(PackageSource::Cache.as_str(), "cache");
        assert_eq!(PackageSource::Index.as_str(), "index");
    }
}
