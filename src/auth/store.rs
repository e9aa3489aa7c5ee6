use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CredentialResult;
use crate::model::entity::User;

/// Lifetime of stored credentials, matching the seven day browser cookie.
pub const CREDENTIALS_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    // tables after plain values
    pub user: User,
}

impl Credentials {
    pub fn new(access_token: String, refresh_token: Option<String>, user: User) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::days(CREDENTIALS_TTL_DAYS),
            user,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub trait CredentialStore: Send + Sync + std::fmt::Debug {
    fn load(&self) -> CredentialResult<Option<Credentials>>;
    fn save(&self, credentials: &Credentials) -> CredentialResult<()>;
    fn clear(&self) -> CredentialResult<()>;
}

/// TOML file on disk, usually `~/.config/lectern/credentials.toml`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> CredentialResult<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&self.path)?;
        let credentials: Credentials = toml::from_str(&text)?;
        if credentials.is_expired(Utc::now()) {
            tracing::debug!("stored credentials expired, removing {}", self.path.display());
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(credentials))
    }

    fn save(&self, credentials: &Credentials) -> CredentialResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let text = toml::to_string(credentials)?;
        std::fs::write(&self.path, text)?;
        tracing::debug!("credentials saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> CredentialResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(credentials: Credentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> CredentialResult<Option<Credentials>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, credentials: &Credentials) -> CredentialResult<()> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> CredentialResult<()> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}
