/// Installs the global subscriber. Call once, from the host binary.
///
/// Filtering follows `RUST_LOG` and defaults to `info`:
/// ```bash
/// RUST_LOG=debug catalog list
/// RUST_LOG=catalog_console::actors=debug,info catalog search lamp
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
