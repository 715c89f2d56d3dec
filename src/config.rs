// User configuration stored in ~/.valet/config.toml

use crate::capability::DistroKind;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Skip host probing and use this distribution (debian, arch, fedora)
    #[serde(default)]
    pub distro: Option<String>,
    #[serde(default)]
    pub detected_distro: Option<String>,
    #[serde(default)]
    pub last_install: Option<String>,
}

impl Config {
    /// The configured distro override, if it names a supported distribution
    pub fn forced_distro(&self) -> Option<DistroKind> {
        let name = self.settings.distro.as_deref()?;

        match name.parse::<DistroKind>() {
            Ok(kind) => Some(kind),
            Err(e) => {
                tracing::warn!(distro = name, error = %e, "Ignoring distro override");
                None
            }
        }
    }

    pub fn record_detected(&mut self, kind: DistroKind) {
        self.settings.detected_distro = Some(kind.name().to_string());
    }

    pub fn record_install(&mut self) {
        self.settings.last_install = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Home directory of the user who invoked the tool, looking through `sudo`
pub fn get_user_home() -> Result<PathBuf> {
    if let Ok(sudo_user) = std::env::var("SUDO_USER") {
        if sudo_user != "root" {
            return Ok(PathBuf::from("/home").join(sudo_user));
        }
    }

    dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))
}

/// Get the ~/.valet directory
pub fn get_valet_home() -> Result<PathBuf> {
    Ok(get_user_home()?.join(".valet"))
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_valet_home()?.join("config.toml"))
}

/// Save config to a file
pub fn save_config_to_file<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create config directory: {}", e))?;
    }

    let toml_str =
        toml::to_string_pretty(config).map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

    std::fs::write(path, toml_str).map_err(|e| anyhow!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Load config from a file, defaulting when it does not exist
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Config::default());
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| anyhow!("Failed to read config file: {}", e))?;

    let config: Config =
        toml::from_str(&contents).map_err(|e| anyhow!("Failed to parse config: {}", e))?;

    Ok(config)
}

/// Load config from the default location
pub fn load_config() -> Result<Config> {
    load_config_from_file(get_config_path()?)
}

/// Save config to the default location
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to_file(config, get_config_path()?)
}
