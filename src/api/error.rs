use reqwest::StatusCode;
use thiserror::Error;

use crate::{auth::CredentialError, model::ResourceType, validation::ValidationErrors};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestTransport: {0}")]
    RequestTransport(#[from] reqwest::Error),

    #[error("RequestRejected, status: {status}. Message: {message}")]
    RequestRejected { status: StatusCode, message: String },

    #[error("RequestMalformedResponse, resource: {resource_type}. Error: {error}")]
    RequestMalformedResponse {
        resource_type: ResourceType,
        error: serde_json::Error,
    },

    #[error("RequestEmptyResponse, resource: {resource_type}")]
    RequestEmptyResponse { resource_type: ResourceType },

    #[error("RequestInvalidUrl: {0}")]
    RequestInvalidUrl(#[from] url::ParseError),
}

impl RequestError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::RequestTransport(e) => e.status(),
            Self::RequestRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::RequestTransport(_) => String::from("Network error, unable to reach the server."),
            Self::RequestRejected { message, .. } if !message.is_empty() => message.clone(),
            Self::RequestRejected { status, .. } => format!("Request failed ({status})."),
            Self::RequestMalformedResponse { .. } | Self::RequestEmptyResponse { .. } => {
                String::from("Unexpected response from the server.")
            }
            Self::RequestInvalidUrl(_) => String::from("Invalid request address."),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("ValidationError - {0}")]
    Validation(#[from] ValidationErrors),
    #[error("RequestError - {0}")]
    Request(#[from] RequestError),
    #[error("Unauthorized - {message}")]
    Unauthorized { message: String },
    #[error("NotFound - {resource_type}")]
    NotFound { resource_type: ResourceType },
    #[error("SessionError - {0}")]
    Session(#[from] CredentialError),
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Request(RequestError::RequestTransport(value))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(value: url::ParseError) -> Self {
        Self::Request(RequestError::RequestInvalidUrl(value))
    }
}

impl ApiError {
    pub fn rejected<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self::Request(RequestError::RequestRejected {
            status,
            message: message.into(),
        })
    }

    pub fn malformed(resource_type: ResourceType, error: serde_json::Error) -> Self {
        Self::Request(RequestError::RequestMalformedResponse {
            resource_type,
            error,
        })
    }

    pub fn empty(resource_type: ResourceType) -> Self {
        Self::Request(RequestError::RequestEmptyResponse { resource_type })
    }

    pub fn not_found(resource_type: ResourceType) -> Self {
        Self::NotFound { resource_type }
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Request(e) => e.status_code(),
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Validation(_) | Self::Session(_) => None,
        }
    }

    /// One-line text suitable for a transient notification.
    pub fn client_display(&self) -> String {
        match self {
            Self::Validation(e) => e
                .errors()
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| String::from("Invalid input.")),
            Self::Request(e) => e.client_display(),
            Self::Unauthorized { .. } => String::from("Session expired, please log in again."),
            Self::NotFound { resource_type } => {
                let name = resource_type.to_string();
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) => format!("{}{} not found.", first.to_uppercase(), chars.as_str()),
                    None => String::from("Not found."),
                }
            }
            Self::Session(_) => String::from("Unable to access stored credentials."),
        }
    }
}
