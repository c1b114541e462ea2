use std::sync::Once;

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DOMBIND_LOG";

/// Installs the global `tracing` subscriber once per process.
///
/// Filter precedence: `DOMBIND_LOG`, then `RUST_LOG`, then `fallback_level`.
pub fn init_logging(fallback_level: &str) {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(fallback_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
