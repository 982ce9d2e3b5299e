//! Waltz selector CLI
//!
//! Inspect default scopes, build canonical selection options and run
//! them against entity fixtures from the command line.

#![warn(missing_docs)]

pub mod app;
pub mod commands;

pub use app::cli;
pub use commands::run;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Honours `RUST_LOG`, defaulting to `info`. Logs go to stderr so that
/// command output on stdout stays machine-readable.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
