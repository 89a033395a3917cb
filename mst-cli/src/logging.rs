//! Structured logging for the CLI.
//!
//! Grounded in `hydro_lang::telemetry::initialize_tracing`, simplified to
//! `tracing_subscriber`'s own formatter: the CLI has no need for the
//! dataflow runtime's ANSI span-naming layer, and nothing else in this
//! workspace pulls in a terminal-colouring dependency.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber, honouring `RUST_LOG` and
/// defaulting to `info` when it is unset or unparsable.
pub fn init() {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
