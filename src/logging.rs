//! Diagnostic logging
//!
//! Tracing output goes to stderr so stdout stays clean for `--json` events
//! and the launched process. `BERTH_LOG` takes an `EnvFilter` directive and
//! wins over `-v`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV_VAR: &str = "BERTH_LOG";

/// Default directive for a `-v` count
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "berth=warn",
        1 => "berth=info",
        2 => "berth=debug",
        _ => "berth=trace",
    }
}

fn filter(verbose: u8, from_env: Option<String>) -> EnvFilter {
    from_env
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbose: u8) {
    let filter = filter(verbose, std::env::var(LOG_ENV_VAR).ok());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
