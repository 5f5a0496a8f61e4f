//! App configuration management.
//!
//! One JSON file at `~/.config/sitedrop/config.json` holding the API token
//! and the site created on first deploy, so history and settings survive a
//! restart.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persisted app configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Personal access token for the hosting API.
    #[serde(default)]
    pub api_token: String,

    /// Site created on first deploy; reused by later deploys.
    #[serde(default)]
    pub site_id: String,

    /// Last known site name, for display before the first settings load.
    #[serde(default)]
    pub site_name: String,
}

impl AppConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields defaults; an unreadable one logs a warning and
    /// yields defaults.
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::load_from(&config_path()?))
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse config, using defaults"
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path()?)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, &json)?;
        // The file holds the bearer token.
        set_permissions_0600(path);
        tracing::debug!("configuration saved");
        Ok(())
    }
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Directory for the config file and the log file.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home).join(".config").join("sitedrop"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("sitedrop"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp").join("sitedrop"))
    }
}
