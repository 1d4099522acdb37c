//! Starting and supervising the single entry point process.

use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::path::Path;
use std::process::Child;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::domain::ports::{BuildEvent, BuildEventSink, ImageManifestRepository};
use crate::error::{BerthError, BerthResult, ProcessStartupError};

use super::plan::LaunchPlan;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CONNECT_TIMEOUT: Duration = Duration::from_millis(200);

/// How long a child gets to exit on its own after a cancel before it is killed
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Options for bringing the entry point up
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Wait until the port accepts connections, at most this long
    pub startup_timeout: Option<Duration>,
}

/// How the entry point ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Whether berth stopped the child
    pub cancelled: bool,
}

impl LaunchOutcome {
    /// Process exit code berth should report.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(code) => code,
            None if self.cancelled => 130,
            None => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Fails with `PortInUse` if `0.0.0.0:<port>` cannot be bound.
pub fn probe_port(port: u16) -> Result<(), ProcessStartupError> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    TcpListener::bind(addr)
        .map(drop)
        .map_err(|source| ProcessStartupError::PortInUse { port, source })
}

/// A spawned entry point
pub struct RunningProcess {
    child: Child,
    port: u16,
    event_sink: Arc<dyn BuildEventSink>,
}

/// Probe the port, spawn the child and optionally wait for readiness.
pub fn start(
    plan: &LaunchPlan,
    options: &LaunchOptions,
    event_sink: Arc<dyn BuildEventSink>,
    cancel: &AtomicBool,
) -> BerthResult<RunningProcess> {
    probe_port(plan.port)?;

    // The child shares stdout; earlier events must not interleave with it.
    event_sink.flush();
    let child = plan
        .command()
        .spawn()
        .map_err(|source| ProcessStartupError::SpawnFailed {
            interpreter: plan.interpreter.clone(),
            source,
        })?;

    info!(
        pid = child.id(),
        module = %plan.module,
        port = plan.port,
        cwd = %plan.app_dir.display(),
        "entry point started"
    );
    event_sink.on_event(BuildEvent::ProcessStarted {
        pid: child.id(),
        module: plan.module.to_string(),
        port: plan.port,
    });
    event_sink.flush();

    let mut process = RunningProcess {
        child,
        port: plan.port,
        event_sink,
    };

    if let Some(timeout) = options.startup_timeout {
        process.await_ready(timeout, cancel)?;
    }

    Ok(process)
}

/// Prepare, start and wait for the entry point of `image_dir`.
pub fn launch<MR: ImageManifestRepository>(
    manifest_repo: &MR,
    image_dir: &Path,
    options: &LaunchOptions,
    event_sink: Arc<dyn BuildEventSink>,
    cancel: &AtomicBool,
) -> BerthResult<LaunchOutcome> {
    let plan = LaunchPlan::prepare(manifest_repo, image_dir)?;
    start(&plan, options, event_sink, cancel)?.wait(cancel)
}

impl RunningProcess {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Poll the port until it accepts a connection. The child is killed on
    /// every failure path.
    fn await_ready(&mut self, timeout: Duration, cancel: &AtomicBool) -> BerthResult<()> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        let started = Instant::now();

        loop {
            if let Some(status) = self.child.try_wait()? {
                let code = status.code();
                self.event_sink.on_event(BuildEvent::ProcessExited { code });
                return Err(ProcessStartupError::ExitedDuringStartup { code }.into());
            }

            if TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok() {
                debug!(port = self.port, elapsed = ?started.elapsed(), "port accepting");
                self.event_sink
                    .on_event(BuildEvent::ProcessReady { port: self.port });
                self.event_sink.flush();
                return Ok(());
            }

            if cancel.load(Ordering::SeqCst) {
                self.kill();
                return Err(BerthError::Cancelled);
            }

            if started.elapsed() >= timeout {
                warn!(port = self.port, ?timeout, "entry point not ready, killing");
                self.kill();
                return Err(ProcessStartupError::NotReady {
                    port: self.port,
                    timeout,
                }
                .into());
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Block until the child exits. Once `cancel` is set the child gets
    /// [`SHUTDOWN_GRACE`] to exit before it is killed.
    pub fn wait(mut self, cancel: &AtomicBool) -> BerthResult<LaunchOutcome> {
        let mut cancelled_at: Option<Instant> = None;

        let status = loop {
            if let Some(status) = self.child.try_wait()? {
                break status;
            }

            if cancel.load(Ordering::SeqCst) {
                let since = *cancelled_at.get_or_insert_with(|| {
                    debug!(pid = self.child.id(), "cancel requested, waiting for child");
                    Instant::now()
                });
                if since.elapsed() >= SHUTDOWN_GRACE {
                    warn!(pid = self.child.id(), "child ignored shutdown, killing");
                    self.child.kill()?;
                    break self.child.wait()?;
                }
            }

            thread::sleep(POLL_INTERVAL);
        };

        let outcome = LaunchOutcome {
            code: status.code(),
            cancelled: cancelled_at.is_some(),
        };
        info!(code = ?outcome.code, cancelled = outcome.cancelled, "entry point exited");
        self.event_sink
            .on_event(BuildEvent::ProcessExited { code: outcome.code });
        Ok(outcome)
    }

    fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
