// Copyright (c) 2026 Pegasus Heavy Industries LLC
// Licensed under the MIT License

//! Configuration file handling.
//!
//! Holds the empirical constants of the pressure and heating models and the
//! fallback cooldown modifiers, persisted as TOML.
//! Default path: `/etc/furnace-profile/config.toml`

use crate::heating::HeatingSettings;
use crate::pressure::PressureSettings;
use crate::profile::ModifierDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/furnace-profile/config.toml";

/// Top-level configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pressure change timing.
    #[serde(default)]
    pub pressure: PressureSettings,

    /// Fallbacks for missing or implausible cooldown modifiers.
    #[serde(default)]
    pub modifiers: ModifierDefaults,

    /// Heating schedule arithmetic.
    #[serde(default)]
    pub heating: HeatingSettings,
}

// ---------------------------------------------------------------------------
// Load / Save
// ---------------------------------------------------------------------------

/// Load config from a TOML file, or return the default if the file doesn't exist.
pub fn load_config(path: &Path) -> io::Result<Config> {
    if !path.exists() {
        log::info!("No config file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to parse config: {e}"),
        )
    })?;

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save config to a TOML file, creating parent directories if needed.
pub fn save_config(path: &Path, config: &Config) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Failed to serialize config: {e}"),
        )
    })?;

    fs::write(path, contents)?;
    log::info!("Saved config to {}", path.display());
    Ok(())
}

/// Resolve the config file path from CLI arg or default.
pub fn resolve_config_path(cli_path: Option<&str>) -> PathBuf {
    cli_path
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
