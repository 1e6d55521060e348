use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const CONFIG_DIR_NAME: &str = "deskctl";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_SESSION_COOKIE: &str = "session";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub session_cookie_name: String,
    pub session_value: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Stored values, then `DESKCTL_*` environment overrides, then the
    /// command-line base URL.
    pub fn load(base_url_override: Option<String>) -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, base_url_override, |key| env::var(key).ok())
    }

    fn resolve(
        stored: StoredConfig,
        base_url_override: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let base_url = non_empty(base_url_override)
            .or_else(|| non_empty(lookup("DESKCTL_BASE_URL")))
            .or_else(|| non_empty(stored.base_url))
            .ok_or_else(|| {
                AppError::Configuration(
                    "helpdesk URL not configured; run `deskctl config init` or pass --base-url"
                        .to_string(),
                )
            })?;

        let session_value =
            non_empty(lookup("DESKCTL_SESSION")).or_else(|| non_empty(stored.session_value));
        let session_cookie_name = non_empty(stored.session_cookie_name)
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

        let timeout_secs = match non_empty(lookup("DESKCTL_TIMEOUT_SECS")) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|err| {
                AppError::Configuration(format!("invalid DESKCTL_TIMEOUT_SECS '{raw}': {err}"))
            })?,
            None => stored.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        if timeout_secs == 0 {
            return Err(AppError::Configuration(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            session_cookie_name,
            session_value,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("cannot locate a config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
