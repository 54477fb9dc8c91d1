//! Logging facade for the embedded AI HAL workspace.
//!
//! Every crate in this workspace logs through the `log` crate's macros
//! directly (`log::info!`, `log::warn!`, ...). This crate only re-exports
//! those macros under the names the original C sources used
//! (`EAI_LOG_INF`/`EAI_LOG_WRN`/`EAI_LOG_ERR`) so call sites read the same
//! way, and provides a demo-only logger initializer for binaries and tests
//! that want readable stderr output.

#![forbid(unsafe_code)]

pub use log::{debug, error, info, trace, warn};

/// Initialize a simple env-configurable logger for demos and tests.
///
/// Not used by library code paths — only by `#[cfg(test)]` modules,
/// integration tests, and example binaries that want human-readable
/// output. Safe to call more than once; later calls are no-ops.
#[cfg(feature = "demo-logger")]
pub fn init_demo_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_logger_init_is_idempotent() {
        init_demo_logger();
        init_demo_logger();
        info!("eai-log self-test");
    }
}
