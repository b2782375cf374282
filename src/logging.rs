//! Tracing setup
//!
//! Logs go to stderr; stdout carries only decoded reports.

/// Initialize tracing for decoder diagnostics
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output. `RUST_LOG`, when set,
/// takes precedence over both levels.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(filter)
        .try_init();
}
