use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::model::entity::User;

/// Payload of an access token issued by the LMS API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
}

impl TokenClaims {
    /// Checks signature and expiry (HS256) before handing the claims out.
    pub fn verify(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Self> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Self>(token, &key, &Validation::default()).map(|data| data.claims)
    }

    pub fn sign(&self, secret: &str) -> jsonwebtoken::errors::Result<String> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    #[inline]
    pub fn belongs_to(&self, user: &User) -> bool {
        self.user_id == user.id()
    }
}
