use tracing_subscriber::EnvFilter;

use nyaa_sort::sort::Verbosity;

/// Install the global log subscriber writing to stderr.
///
/// `RUST_LOG` overrides the level picked from the verbosity.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity == Verbosity::Debug)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(error) = result {
        nyaa_sort::print_warning!("Logging was already initialized: {error}");
    }
}
