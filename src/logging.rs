use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console logging for the CLI.
///
/// # Configuration
///
/// - **Filter**: `RUST_LOG` when set, otherwise `LOG_LEVEL` (default: "info")
///   for this crate and the workspace crates
/// - **Filtering**: HTTP client internals are held at warn
/// - **Output**: stderr, so table output on stdout stays clean
pub fn init_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    // A subscriber may already be set (tests); keep that one.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

fn default_directives(level: &str) -> String {
    format!(
        "{crate_name}={level},educonnect_auth={level},educonnect_core={level},\
         educonnect_models={level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn",
        crate_name = env!("CARGO_CRATE_NAME"),
    )
}
