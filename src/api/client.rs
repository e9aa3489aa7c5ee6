use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, multipart};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    Config,
    api::{ApiError, ApiResult},
    auth::Session,
    error::AppResult,
    model::{Attachment, Envelope, ErrorEnvelope, ResourceType},
};

/// Typed access to the LMS REST API. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(base_url: Url, session: Arc<Session>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn from_config(config: &Config, session: Arc<Session>) -> AppResult<Self> {
        let base_url = config.api().base_url()?;
        Ok(Self::new(base_url, session)?)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `route` is a fixed path; each of `ids` becomes one percent-encoded segment.
    pub(crate) fn url(&self, route: &str, ids: &[&str]) -> ApiResult<Url> {
        let mut target = self.base_url.join(route.trim_start_matches('/'))?;
        if !ids.is_empty() {
            let mut segments = target
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            segments.pop_if_empty().extend(ids);
        }
        Ok(target)
    }

    /// Request builder with the session token attached.
    pub(crate) fn request(&self, method: Method, route: &str) -> ApiResult<RequestBuilder> {
        self.request_to(method, route, &[])
    }

    pub(crate) fn request_to(
        &self,
        method: Method,
        route: &str,
        ids: &[&str],
    ) -> ApiResult<RequestBuilder> {
        let url = self.url(route, ids)?;
        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.header(reqwest::header::AUTHORIZATION, token);
        }
        Ok(builder)
    }

    /// Sends the request and decodes the body as `T` without unwrapping an envelope.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource_type: ResourceType,
    ) -> ApiResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(&bytes);
            tracing::warn!("unauthorized ({}), tearing down session", message);
            self.session.teardown();
            return Err(ApiError::unauthorized(message));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::not_found(resource_type));
        }

        if !status.is_success() {
            return Err(ApiError::rejected(status, error_message(&bytes)));
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::malformed(resource_type, e))
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource_type: ResourceType,
    ) -> ApiResult<Envelope<T>> {
        let envelope: Envelope<T> = self.send_json(builder, resource_type).await?;
        if !envelope.success {
            return Err(ApiError::rejected(StatusCode::OK, envelope.message));
        }
        Ok(envelope)
    }

    /// Like [`ApiClient::send`] but requires `data` to be present.
    pub(crate) async fn send_data<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource_type: ResourceType,
    ) -> ApiResult<T> {
        self.send::<T>(builder, resource_type)
            .await?
            .data
            .ok_or_else(|| ApiError::empty(resource_type))
    }
}

fn error_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<ErrorEnvelope>(bytes)
        .map(|e| e.message)
        .unwrap_or_default()
}

pub(crate) fn file_part(attachment: &Attachment) -> ApiResult<multipart::Part> {
    let part = multipart::Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime)?;
    Ok(part)
}
