use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};

const CONFIG_ENV: &str = "GATELINK_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Device {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poller {
    pub interval_ms: u64,
}

impl Poller {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub device: Device,
    #[serde(default)]
    pub poller: Poller,
}

impl Settings {
    /// Loads the embedded defaults, or the file named by `GATELINK_CONFIG`.
    pub fn new() -> Result<Self, SettingsError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Self::normalize_path(PathBuf::from(path))),
            None => Self::from_toml(include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../",
                "configs/default.toml"
            ))),
        }
    }

    pub fn from_file(path: PathBuf) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.poller.interval_ms == 0 {
            return Err(SettingsError::Invalid("poller.interval_ms must be positive".into()));
        }
        if self.device.request_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "device.request_timeout_ms must be positive".into(),
            ));
        }
        if self.device.connect_timeout_ms == 0 {
            return Err(SettingsError::Invalid(
                "device.connect_timeout_ms must be positive".into(),
            ));
        }
        if !self.device.base_url.starts_with("http://") && !self.device.base_url.starts_with("https://") {
            return Err(SettingsError::Invalid(format!(
                "device.base_url must be an http(s) URL, got {}",
                self.device.base_url
            )));
        }

        Ok(())
    }

    fn normalize_path(path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            env::current_dir()
                .map(|dir| dir.join(&path))
                .unwrap_or(path)
        }
    }
}
