// Logging setup. RUST_LOG wins over --log-level; output goes to stderr so
// stdout stays clean for the execution id.

use tracing_subscriber::EnvFilter;

pub fn init(level: &str, quiet: bool) {
    let fallback = if quiet { "warn" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init();
}
