pub mod build_info;
pub mod paths;

use std::sync::Once;

pub use paths::{app_data_dir, ensure_dir, PathResolver};

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "cartera_core=info";

/// Initializes the global tracing subscriber. `RUST_LOG` takes precedence over
/// the crate default.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // A subscriber installed by the host process wins.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
