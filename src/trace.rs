use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, writing to stderr so stdout stays free.
///
/// `levels` is an env-filter directive string such as `fluentd_forwarder=debug`.
pub fn init(color: bool, json: bool, levels: &str) {
    let filter = EnvFilter::try_new(levels).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // Ignore errors when setting, since tests can initialize this multiple times.
    let _ = if json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.with_ansi(color).try_init()
    };
}
