//! Persistent settings
//!
//! Loaded from `config.json` under the XDG config directory. Missing files and
//! missing fields fall back to defaults so a fresh install needs no setup.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{config, defaults, paths};
use crate::input::device_detection::InputPaths;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the evdev device nodes
    pub input_dir: PathBuf,
    /// sysfs input class directory
    pub sysfs_input_dir: PathBuf,
    /// Name prefix of the device nodes to inspect
    pub device_prefix: String,
    /// Interval between scans in watch mode
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(paths::DEV_INPUT),
            sysfs_input_dir: PathBuf::from(paths::SYS_CLASS_INPUT),
            device_prefix: paths::EVENT_DEVICE_PREFIX.to_string(),
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

impl Settings {
    /// Path of the settings file, honoring the config directory override
    pub fn path() -> PathBuf {
        let mut path = match std::env::var_os(config::DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
                dir.push(config::APP_DIR);
                dir
            }
        };
        path.push(config::FILENAME);
        path
    }

    /// Load settings, falling back to defaults when the file is unusable
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(&Self::path())
    }

    pub fn load_or_default_from(config_path: &std::path::Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            warn!(error = ?e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            debug!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let settings: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", config_path))?;

        info!(path = %config_path.display(), "Loaded config");
        Ok(settings)
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, json)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        info!(path = %config_path.display(), "Saved config");
        Ok(())
    }

    /// Watch mode interval, clamped to a sane minimum
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms.max(defaults::MIN_POLL_INTERVAL_MS))
    }

    pub fn input_paths(&self) -> InputPaths {
        InputPaths {
            dev_input: self.input_dir.clone(),
            sys_class_input: self.sysfs_input_dir.clone(),
            device_prefix: self.device_prefix.clone(),
        }
    }
}
