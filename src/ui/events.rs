//! Console Event Sink
//!
//! Human-readable progress for stage, assemble and launch.

use std::io::{self, Write};
use std::sync::Mutex;

use berth::domain::ports::{BuildEvent, BuildEventSink};

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::{dim, Icon};

pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    color: bool,
    unicode: bool,
    progress: bool,
}

impl ConsoleEventSink {
    pub fn stdout(ui: &UiContext) -> Self {
        Self::with_writer(io::stdout(), ui)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, ui: &UiContext) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            color: ui.color,
            unicode: ui.unicode,
            progress: ui.progress,
        }
    }

    fn line(&self, icon: Icon, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{} {}", icon.colored(self.color, self.unicode), text);
            let _ = writer.flush();
        }
    }

    fn detail(&self, text: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(
                writer,
                "  {} {}",
                Icon::Arrow.render(self.unicode),
                dim(text, self.color)
            );
            let _ = writer.flush();
        }
    }

    fn render(&self, event: BuildEvent) {
        match event {
            BuildEvent::StageStarted {
                lock,
                package_count,
            } => self.line(
                Icon::Stage,
                &format!(
                    "Staging {} locked package(s) from {}",
                    package_count,
                    lock.display()
                ),
            ),
            BuildEvent::PackageResolved {
                name,
                version,
                source,
            } => self.detail(&format!("{}=={} ({})", name, version, source.as_str())),
            BuildEvent::PackageInstalled {
                name, file_count, ..
            } => self.detail(&format!("{} installed, {} file(s)", name, file_count)),
            BuildEvent::StageCompleted {
                stage_dir,
                package_count,
                file_count,
            } => self.line(
                Icon::Success,
                &format!(
                    "Staged {} package(s), {} file(s) in {}",
                    package_count,
                    file_count,
                    stage_dir.display()
                ),
            ),
            BuildEvent::AssembleStarted { image_dir } => self.line(
                Icon::Image,
                &format!("Assembling image in {}", image_dir.display()),
            ),
            BuildEvent::ToolingExcluded { name } => {
                self.detail(&format!("{} left out (build-only)", name))
            }
            BuildEvent::AssembleCompleted {
                image_dir,
                package_count,
                source_file_count,
            } => self.line(
                Icon::Success,
                &format!(
                    "Image ready: {} package(s), {} source file(s) in {}",
                    package_count,
                    source_file_count,
                    image_dir.display()
                ),
            ),
            BuildEvent::ProcessStarted { pid, module, port } => self.line(
                Icon::Run,
                &format!("Started {} (pid {}) on port {}", module, pid, port),
            ),
            BuildEvent::ProcessReady { port } => self.line(
                Icon::Success,
                &format!("Listening on 0.0.0.0:{}", port),
            ),
            BuildEvent::ProcessExited { code } => match code {
                Some(0) => self.line(Icon::Success, "Process exited cleanly"),
                Some(code) => self.line(Icon::Error, &format!("Process exited with code {}", code)),
                None => self.line(Icon::Warning, "Process terminated by signal"),
            },
        }
    }
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        self.render(event);
    }

    fn wants_detailed_events(&self) -> bool {
        self.progress
    }
}
