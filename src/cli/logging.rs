use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `-v` raises the crate's level to debug, `-vv` to trace; `RUST_LOG` wins
/// when set. Safe to call more than once.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("html_test_report={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
