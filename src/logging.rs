//! Diagnostic tracing for the phonebook.
//!
//! Messages for the person at the menu go to stdout through the commands.
//! Tracing is for debugging only: it goes to stderr and is silent below
//! `warn` unless `RUST_LOG` asks for more.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=phonebook=debug phonebook --file contacts.json
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
