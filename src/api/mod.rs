mod client;
pub use client::ApiClient;

mod error;
pub use error::{ApiError, ApiResult, RequestError};

pub mod routes;
