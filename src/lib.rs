pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod api;
pub mod auth;
pub mod error;
pub mod learn;
pub mod model;
pub mod progress;
pub mod utils;
pub mod validation;

static APPLICATION_NAME: &str = "lectern";

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
