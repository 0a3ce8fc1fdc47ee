// Configuration management for the farewell CLI
//
// Cross-platform config stored in:
// - macOS: ~/Library/Application Support/farewell/config.json
// - Linux: ~/.config/farewell/config.json
// - Windows: %APPDATA%\farewell\config.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CREDENTIAL: &str = "class11th2025-26";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port for `farewell serve`
    pub listen_port: u16,

    /// Storage path for the sled database (defaults to the data dir)
    pub storage_path: Option<String>,

    /// Shared basic-auth credential guarding the HTTP API
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub user: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: 8080,
            storage_path: None,
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_CREDENTIAL.to_string(),
            password: DEFAULT_CREDENTIAL.to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path (cross-platform)
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("farewell");

        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir)
    }

    /// Get the data directory path (cross-platform)
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to determine data directory")?
            .join("farewell");

        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(data_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            let config: Config =
                serde_json::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Where the sled database lives
    pub fn resolve_storage_path(&self) -> Result<PathBuf> {
        match self.storage_path {
            Some(ref path) => Ok(PathBuf::from(path)),
            None => Ok(Self::data_dir()?.join("storage")),
        }
    }

    /// Set a config value in memory; callers persist with `save`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "listen_port" => {
                self.listen_port = value.parse().context("Invalid port number")?;
            }
            "storage_path" => {
                self.storage_path = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "auth_user" => {
                if value.is_empty() {
                    anyhow::bail!("auth_user cannot be empty");
                }
                self.auth.user = value.to_string();
            }
            "auth_password" => {
                if value.is_empty() {
                    anyhow::bail!("auth_password cannot be empty");
                }
                self.auth.password = value.to_string();
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "listen_port" => Some(self.listen_port.to_string()),
            "storage_path" => self.storage_path.clone(),
            "auth_user" => Some(self.auth.user.clone()),
            "auth_password" => Some(self.auth.password.clone()),
            _ => None,
        }
    }

    /// All config values; the password is masked
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            ("listen_port".to_string(), self.listen_port.to_string()),
            (
                "storage_path".to_string(),
                self.storage_path
                    .clone()
                    .unwrap_or_else(|| "(auto)".to_string()),
            ),
            ("auth_user".to_string(), self.auth.user.clone()),
            ("auth_password".to_string(), "********".to_string()),
        ]
    }
}
