pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod utils;
pub mod web;

// re-export
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use web::serve::serve;

use tracing_subscriber::EnvFilter;

/// Compact human-readable tracing, used during development.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .init();
}

/// Tracing for production deployments, filter defaults to `info`.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
