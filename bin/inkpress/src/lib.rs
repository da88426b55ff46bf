//! Inkpress CLI Library
//!
//! Serves the compiled Inkpress frontend together with the public client
//! configuration, and validates configuration files.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, check)
//! - [`server`] - Asset server router
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! // Validate a configuration file
//! inkpress::cmd::check::run(Path::new("inkpress.toml")).unwrap();
//! ```

pub mod cmd;
pub mod server;

pub use inkpress_core::{ClientConfig, Config};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
