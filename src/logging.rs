//! Log output for applications and tests.
//!
//! The library only emits `tracing` events: `debug` for every native entry
//! point, `trace` for option encoding and stored objects, `warn` for
//! failures that cannot be returned (release in `Drop`). Nothing is printed
//! unless a subscriber is installed, e.g. with [`init`].

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the filter directives used by [`init`].
pub const LOG_ENV: &str = "VISFILE_LOG";

/// Install a formatting subscriber filtered by `VISFILE_LOG`
/// (e.g. `VISFILE_LOG=visfile=debug`), defaulting to `warn`.
///
/// Safe to call more than once; only the first call installs anything.
/// Returns `true` if this call installed the subscriber.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()
        .is_ok()
}
