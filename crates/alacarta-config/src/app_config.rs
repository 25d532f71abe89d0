//! Application configuration
//!
//! Configuration loaded from `.alacarta.toml`. Every field has a default, so a
//! partial file only overrides what it names.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from `.alacarta.toml`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Username accepted by the admin login
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Password accepted by the admin login
    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    /// Phone number orders are sent to (digits only, used in the wa.me link)
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// How often each tab polls the shared storage for changes
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Delay of the simulated remote sync round trip
    #[serde(default = "default_remote_sync_delay_ms")]
    pub remote_sync_delay_ms: u64,

    /// Directory backing the shared storage (None = platform data dir)
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,

    /// Directory system export archives are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_whatsapp_number() -> String {
    "5354690878".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_remote_sync_delay_ms() -> u64 {
    1000
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            whatsapp_number: default_whatsapp_number(),
            poll_interval_secs: default_poll_interval_secs(),
            remote_sync_delay_ms: default_remote_sync_delay_ms(),
            storage_dir: None,
            export_dir: default_export_dir(),
        }
    }
}

impl AppConfig {
    /// Load config from `$ALACARTA_CONFIG`, CWD or home directory, or use defaults
    pub fn load() -> Self {
        if let Some(source) = crate::load_config_file() {
            match toml::from_str(&source.content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", source.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", source.path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// Polling period of the cross-tab sync service
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Delay of the simulated remote sync
    pub fn remote_sync_delay(&self) -> Duration {
        Duration::from_millis(self.remote_sync_delay_ms)
    }

    /// Resolve the storage directory, falling back to the platform data dir
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::paths::default_storage_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, "admin123");
        assert_eq!(config.whatsapp_number, "5354690878");
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.remote_sync_delay(), Duration::from_millis(1000));
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            whatsapp_number = "5355555555"
            poll_interval_secs = 2
            storage_dir = "/tmp/alacarta-test"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.whatsapp_number, "5355555555");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(
            config.storage_dir().unwrap(),
            PathBuf::from("/tmp/alacarta-test")
        );
        // Untouched fields keep their defaults
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config: AppConfig = toml::from_str("poll_interval_secs = 0").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
