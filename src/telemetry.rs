use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
///
/// Installs a JSON subscriber filtered by `RUST_LOG`, falling back to
/// `log_level`. Returns `false` and leaves the current subscriber in place
/// if a global one is already set.
pub fn init_tracing(log_level: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .try_init()
        .is_ok()
}
