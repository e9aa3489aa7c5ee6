//! Signed-in state shared by the API client and every view built on it.

use std::sync::RwLock;

use crate::auth::{CredentialResult, CredentialStore, Credentials, TokenClaims};
use crate::error::log_error;
use crate::model::entity::User;

#[derive(Debug)]
pub struct Session {
    store: Box<dyn CredentialStore>,
    jwt_secret: Option<String>,
    current: RwLock<Option<Credentials>>,
}

impl Session {
    /// Empty session; call [`Session::restore`] to pick up stored credentials.
    pub fn new<S: CredentialStore + 'static>(store: S, jwt_secret: Option<String>) -> Self {
        Self {
            store: Box::new(store),
            jwt_secret,
            current: RwLock::new(None),
        }
    }

    /// Loads stored credentials. With a secret configured, tokens that fail
    /// verification or name another user are discarded.
    #[tracing::instrument(skip(self))]
    pub fn restore(&self) -> CredentialResult<Option<User>> {
        let Some(credentials) = self.store.load()? else {
            return Ok(None);
        };

        if let Some(secret) = &self.jwt_secret {
            let accepted = match TokenClaims::verify(&credentials.access_token, secret) {
                Ok(claims) => claims.belongs_to(&credentials.user),
                Err(e) => {
                    tracing::warn!("stored token rejected: {}", e);
                    false
                }
            };
            if !accepted {
                self.store.clear()?;
                return Ok(None);
            }
        }

        let user = credentials.user.clone();
        *self.write() = Some(credentials);
        tracing::debug!("session restored for {}", user.email());
        Ok(Some(user))
    }

    pub fn establish(&self, credentials: Credentials) -> CredentialResult<()> {
        self.store.save(&credentials)?;
        *self.write() = Some(credentials);
        Ok(())
    }

    /// Forgets the user and wipes stored credentials.
    pub fn teardown(&self) {
        *self.write() = None;
        if let Err(e) = self.store.clear() {
            log_error(&e);
        }
        tracing::debug!("session torn down");
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|c| c.access_token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.read().as_ref().map(|c| c.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|c| c.user.is_admin())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Credentials>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credentials>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}
