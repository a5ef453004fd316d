// User settings
// Loaded from ~/.config/followcheck/settings.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use followcheck_recon::ReconOptions;

/// How `check` prints its result when no flag overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Readable summary on stdout (default)
    #[default]
    Human,
    /// Single JSON document on stdout
    Json,
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,

    /// Add a profile-link column to CSV exports
    pub csv_profile_urls: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            csv_profile_urls: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub recon: ReconOptions,
    pub output: OutputSettings,
}

impl Settings {
    /// Default settings file location
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("followcheck")
            .join("settings.toml")
    }

    /// Load from the default location. A missing or broken file falls back
    /// to defaults; the problem is logged, never fatal.
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Load from an explicit path. Errors are returned to the caller.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        Self::from_toml(&contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn from_toml(input: &str) -> Result<Self, String> {
        let settings: Settings = toml::from_str(input).map_err(|e| e.to_string())?;
        settings.recon.validate().map_err(|e| e.to_string())?;
        Ok(settings)
    }
}
