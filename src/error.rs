use thiserror::Error;
use tracing::error;
use tracing_error::SpanTrace;

use crate::{api::ApiError, auth::CredentialError, learn::LearnError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
    #[error("credential error: {0}")]
    CredentialError(#[from] CredentialError),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    #[error("{0}")]
    LearnError(#[from] LearnError),
    #[error("admin access required")]
    AdminRequired,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::ApiError(e) => e.is_unauthorized(),
            Self::LearnError(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Message fit for the person at the terminal.
    pub fn client_display(&self) -> String {
        match self {
            // every field, one per line
            Self::ApiError(ApiError::Validation(errors)) => errors
                .errors()
                .iter()
                .map(|f| format!("{}: {}", f.field, f.message))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::ApiError(e) | Self::LearnError(LearnError::Api(e)) => e.client_display(),
            Self::AdminRequired => String::from("Admin access required."),
            other => other.to_string(),
        }
    }
}

pub async fn run_with_error_handler<F, T>(run: F) -> T
where
    F: AsyncFn() -> AppResult<T>,
    T: Send + Sync,
{
    match run().await {
        Ok(value) => value,
        Err(e) => {
            default_error_handler(e);
            std::process::exit(1);
        }
    }
}

fn default_error_handler(error: AppError) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
    eprintln!("{}", error.client_display());
}

pub fn log_error<E: std::error::Error + std::fmt::Display>(error: &E) {
    let span = SpanTrace::capture();
    error!("{}\n{}", error, span);
}
