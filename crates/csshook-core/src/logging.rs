use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,csshook=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global fmt subscriber.
///
/// Panics if a global subscriber has already been set; use [`try_init`] where
/// that can happen (tests, benches).
pub fn init() {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Install the global fmt subscriber, returning `false` if one already exists.
pub fn try_init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .try_init()
        .is_ok()
}
