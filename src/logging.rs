//! Tracing setup for the `rollover` binary

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Directive used when `RUST_LOG` is not set
pub const DEFAULT_DIRECTIVE: &str = "envelope_rollover=info";

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` overrides the default directive. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
