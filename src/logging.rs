use tracing_subscriber::EnvFilter;

/// Logs go to stderr so the wrapped command's own output stays untouched.
/// `RUST_LOG` takes precedence over the default level.
pub fn init_console_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
