use std::path::PathBuf;

use super::error::{ConfigError, ConfigResult};

const CONFIG_FILE: &str = "config.toml";

/// Per-user directory holding `config.toml` and stored credentials.
///
/// `$HOME/.config/lectern` on unix, `%APPDATA%\lectern` on windows.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(unix)]
    let base = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(any(unix, windows)))]
    let base: Option<PathBuf> = None;

    base.map(|dir| dir.join(crate::APPLICATION_NAME))
}

/// `./config.toml` when `use_local`, else the user copy if one exists.
pub fn find_config_file(use_local: bool) -> PathBuf {
    let local = PathBuf::from(".").join(CONFIG_FILE);
    if use_local {
        return local;
    }

    config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.is_file())
        .unwrap_or(local)
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    let path = find_config_file(use_local);
    tracing::trace!("looking for config at: {}", path.display());

    match std::fs::read(&path) {
        Ok(bytes) => {
            tracing::debug!("using {} as configuration file", path.display());
            Ok(bytes)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::ConfigNotFound),
        Err(e) => Err(e.into()),
    }
}
