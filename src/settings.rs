use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::http::{FetchOptions, DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

/// Userinfo sent when the upstream does not report one: nothing used, 10 GiB total.
pub const DEFAULT_SUBSCRIPTION_USERINFO: &str =
    "upload=0; download=0; total=10737418240; expire=0";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported settings file type: {0}")]
    UnsupportedFormat(String),
}

/// Settings structure to hold service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_address: String,
    pub listen_port: u16,
    pub workers: usize,

    // Upstream fetch
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: usize,

    /// `Subscription-Userinfo` value used when the upstream sends none
    pub subscription_userinfo: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            listen_address: "127.0.0.1".to_string(),
            listen_port: 3000,
            workers: 4,
            fetch_timeout_secs: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            subscription_userinfo: DEFAULT_SUBSCRIPTION_USERINFO.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a `.toml`, `.yaml` or `.yml` file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "toml" => Self::from_toml(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        // an empty file deserializes to null, which means "all defaults"
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// `address:port`, unless `listen_address` already carries a port
    pub fn listen_addr(&self) -> String {
        if self.listen_address.trim().is_empty() {
            format!("127.0.0.1:{}", self.listen_port)
        } else if self.listen_address.contains(':') {
            self.listen_address.clone()
        } else {
            format!("{}:{}", self.listen_address, self.listen_port)
        }
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
        }
    }
}
