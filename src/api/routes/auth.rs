use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{ApiClient, ApiError, ApiResult},
    auth::Credentials,
    model::{ResourceType, ResourceTyped, entity::User},
    validation::{validate_login, validate_registration},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenFields {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

/// Login answers carry the token beside the envelope fields; some deployments nest it in `data`.
#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(flatten)]
    top: TokenFields,
    #[serde(default)]
    data: Option<TokenFields>,
}

impl LoginBody {
    fn into_parts(self) -> (Option<String>, Option<String>, Option<User>) {
        let nested = self.data.unwrap_or_default();
        (
            self.top.access_token.or(nested.access_token),
            self.top.refresh_token.or(nested.refresh_token),
            self.top.user.or(nested.user),
        )
    }
}

impl ApiClient {
    /// Signs in, persists the credentials and fills the session.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        validate_login(email, password)?;

        let req = self
            .request(Method::POST, "auth/login")?
            .json(&json!({ "email": email, "password": password }));
        let body: LoginBody = self.send_json(req, User::get_resource_type()).await?;

        let (token, refresh, user) = body.into_parts();
        let token = token.ok_or_else(|| ApiError::empty(ResourceType::User))?;
        let user = user.ok_or_else(|| ApiError::empty(ResourceType::User))?;

        self.session()
            .establish(Credentials::new(token, refresh, user.clone()))?;
        tracing::info!("signed in as {}", user.email());
        Ok(user)
    }

    /// Creates the account, then signs in with the same credentials.
    #[tracing::instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> ApiResult<User> {
        validate_registration(name, email, password, confirm_password)?;

        let req = self
            .request(Method::POST, "auth/register")?
            .json(&json!({ "name": name, "email": email, "password": password }));
        self.send::<serde_json::Value>(req, User::get_resource_type())
            .await?;

        self.login(email, password).await
    }

    /// Local credentials are cleared even when the server call fails.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) {
        let result = match self.request(Method::POST, "auth/logout") {
            Ok(req) => self
                .send::<serde_json::Value>(req, User::get_resource_type())
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::warn!("logout request failed: {}", e);
        }
        self.session().teardown();
    }

    /// Exchanges the stored refresh token for a new access token.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_token(&self) -> ApiResult<()> {
        let user = self
            .session()
            .user()
            .ok_or_else(|| ApiError::unauthorized("not signed in"))?;

        let req = self.request(Method::POST, "auth/refresh-token")?;
        let body: LoginBody = self.send_json(req, User::get_resource_type()).await?;

        let (token, refresh, _) = body.into_parts();
        let token = token.ok_or_else(|| ApiError::empty(ResourceType::User))?;
        self.session()
            .establish(Credentials::new(token, refresh, user))?;
        Ok(())
    }
}
