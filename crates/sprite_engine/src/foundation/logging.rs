//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    init_with_filter("info");
}

/// Initialize the logging system with a default filter.
///
/// `RUST_LOG` still wins when set. Calling this twice is harmless; the
/// second initialisation is ignored.
pub fn init_with_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
