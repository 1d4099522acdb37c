//! JSON Event Sink
//!
//! Outputs build events as NDJSON for CI/automation consumption.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    unbuffered: bool,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(unbuffered: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            unbuffered,
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W, unbuffered: bool) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            unbuffered,
        }
    }

    /// Emit a terminal error event. Not part of [`BuildEvent`] because errors
    /// end the run instead of flowing through a use case.
    pub fn error(&self, kind: &str, message: &str) {
        self.write_event(serde_json::json!({
            "event": "error",
            "kind": kind,
            "message": message,
        }));
    }

    fn write_event(&self, mut event: serde_json::Value) {
        if let Some(obj) = event.as_object_mut() {
            obj.insert(
                "ts".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            if self.unbuffered {
                let _ = writer.flush();
            }
        }
    }
}

impl Drop for JsonEventSink {
    fn drop(&mut self) {
        if let Ok(writer) = self.writer.get_mut() {
            let _ = writer.flush();
        }
    }
}

impl BuildEventSink for JsonEventSink {
    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }

    fn on_event(&self, event: BuildEvent) {
        let json = match event {
            BuildEvent::StageStarted {
                lock,
                package_count,
            } => serde_json::json!({
                "event": "stage_start",
                "lock": lock.display().to_string(),
                "package_count": package_count,
            }),

            BuildEvent::PackageResolved {
                name,
                version,
                source,
            } => serde_json::json!({
                "event": "package_resolved",
                "name": name.as_str(),
                "version": version,
                "source": source.as_str(),
            }),

            BuildEvent::PackageInstalled {
                name,
                version,
                file_count,
            } => serde_json::json!({
                "event": "package_installed",
                "name": name.as_str(),
                "version": version,
                "files": file_count,
            }),

            BuildEvent::StageCompleted {
                stage_dir,
                package_count,
                file_count,
            } => serde_json::json!({
                "event": "stage_complete",
                "stage_dir": stage_dir.display().to_string(),
                "packages": package_count,
                "files": file_count,
            }),

            BuildEvent::AssembleStarted { image_dir } => serde_json::json!({
                "event": "assemble_start",
                "image_dir": image_dir.display().to_string(),
            }),

            BuildEvent::ToolingExcluded { name } => serde_json::json!({
                "event": "tooling_excluded",
                "name": name.as_str(),
            }),

            BuildEvent::AssembleCompleted {
                image_dir,
                package_count,
                source_file_count,
            } => serde_json::json!({
                "event": "assemble_complete",
                "image_dir": image_dir.display().to_string(),
                "packages": package_count,
                "source_files": source_file_count,
            }),

            BuildEvent::ProcessStarted { pid, module, port } => serde_json::json!({
                "event": "process_start",
                "pid": pid,
                "module": module,
                "port": port,
            }),

            BuildEvent::ProcessReady { port } => serde_json::json!({
                "event": "process_ready",
                "port": port,
            }),

            BuildEvent::ProcessExited { code } => serde_json::json!({
                "event": "process_exit",
                "code": code,
            }),
        };

        self.write_event(json);
    }
}
