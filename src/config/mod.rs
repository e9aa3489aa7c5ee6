use std::path::PathBuf;

use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{config_dir, find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};

pub static DEFAULT_BASE_URL: &str = "https://lms-task-backend.onrender.com/api/v1";
pub static BASE_URL_ENV: &str = "LECTERN_API_URL";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    api: Api,
    #[serde(default)]
    session: SessionSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    #[serde(default = "default_base_url")]
    base_url: String,
    jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    credentials_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            jwt_secret: None,
        }
    }
}

impl Config {
    /// Reads `config.toml`, falling back to defaults when no file exists.
    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let mut config = match read_config(use_local) {
            Ok(bytes) => toml::from_slice(&bytes)?,
            Err(ConfigError::ConfigNotFound) => {
                tracing::debug!("no config file found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            tracing::debug!("{} overrides api.base_url", BASE_URL_ENV);
            config.api.base_url = url;
        }

        config.api.base_url()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.api.base_url()?;
        Ok(config)
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        tracing::warn!("falling back to default configuration");
                        Self::default()
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn api(&self) -> &Api {
        &self.api
    }

    #[inline]
    pub fn session(&self) -> &SessionSection {
        &self.session
    }
}

impl Api {
    /// Base URL with a trailing slash so that relative joins keep the `/api/v1` prefix.
    pub fn base_url(&self) -> ConfigResult<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }

        Url::parse(&raw).map_err(|error| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            error,
        })
    }

    #[inline]
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref()
    }
}

impl SessionSection {
    /// Location of the credential file, `<config dir>/credentials.toml` unless overridden.
    pub fn credentials_path(&self) -> PathBuf {
        if let Some(path) = &self.credentials_path {
            return path.clone();
        }

        config_dir()
            .map(|dir| dir.join("credentials.toml"))
            .unwrap_or_else(|| PathBuf::from("./credentials.toml"))
    }
}
