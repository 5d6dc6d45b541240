use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr so the post-command keeps stdout to itself.
/// `RUST_LOG` overrides the level picked from `--debug`.
pub fn init(debug: bool) {
    let default_filter = if debug { "waitgate=debug" } else { "waitgate=warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
