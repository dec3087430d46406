//! hestia-site: content collections for the Hestia documentation website
//!
//! Loads the site's content collections (comments and documentation pages),
//! validates every record against its schema and checks the site
//! configuration against the resolved content.

pub mod cli;
pub mod core;
pub mod schema;
pub mod yaml;

/// Initialize tracing for the binary.
///
/// Without `-v` the filter comes from `RUST_LOG`, defaulting to warnings.
/// Each `-v` raises the level, overriding the global level of `RUST_LOG`
/// while keeping its per-target directives.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if verbose == 0 => filter,
        Ok(filter) => filter.add_directive(level.into()),
        Err(_) => EnvFilter::new(level.as_str()),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
