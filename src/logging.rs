//! Log output setup
//!
//! The crate only emits `tracing` events. Applications that do not install
//! their own subscriber can call [`init`] to get formatted output filtered
//! by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "firebase_bridge=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global fmt subscriber
///
/// Does nothing if a global subscriber is already set.
pub fn init() {
    let _ = try_init();
}

/// Install a global fmt subscriber, reporting whether one was already set
pub fn try_init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
}
