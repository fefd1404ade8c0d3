use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout carries only the answer.
///
/// Verbosity: 0 = warnings, 1 = info, 2 = debug, 3+ = trace (includes every ring searched).
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::new(format!("coords2country={level}"));

    // Already initialized is fine, e.g. when called twice in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
