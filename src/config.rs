//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the argo-config.toml file.
//! It collects the quality-code acceptance sets, the downsampling bin sizes and the
//! derived-quantity integration settings. Every operation receives the section it
//! needs explicitly; nothing here is global.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "argo-config.toml";

/// Application configuration loaded from argo-config.toml
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Level filtering by quality code
    #[serde(default)]
    pub qc: QcConfig,
    /// Spatio-temporal bins for downsampling
    #[serde(default)]
    pub binning: BinConfig,
    /// Mixed-layer depth and dynamic height settings
    #[serde(default)]
    pub derived: DerivedConfig,
}

/// Quality codes accepted for each measured variable.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QcConfig {
    pub pressure: Vec<u8>,
    pub temperature: Vec<u8>,
    pub salinity: Vec<u8>,
    /// Levels at or below this pressure (dbar) are dropped when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure: Option<f64>,
}

/// Bin sizes used to group profiles before choosing one per bin.
///
/// The defaults (0.1 degrees, 1 day) are what published tables were built with.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct BinConfig {
    /// Longitude and latitude bin width in degrees
    pub spatial_degrees: f64,
    /// Time bin width in days
    pub temporal_days: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct DerivedConfig {
    /// `[top, reference]` pressures (dbar) for dynamic height anomaly
    pub dha_range: [f64; 2],
    /// Integration comb spacing in dbar
    pub dha_spacing: f64,
}

impl Default for QcConfig {
    fn default() -> Self {
        QcConfig {
            pressure: vec![1, 2],
            temperature: vec![1, 2],
            salinity: vec![1, 2],
            max_pressure: None,
        }
    }
}

impl Default for BinConfig {
    fn default() -> Self {
        BinConfig {
            spatial_degrees: 0.1,
            temporal_days: 1.0,
        }
    }
}

impl Default for DerivedConfig {
    fn default() -> Self {
        DerivedConfig {
            dha_range: [10.0, 1000.0],
            dha_spacing: 0.2,
        }
    }
}

impl Config {
    /// Load configuration from argo-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file format, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Write this configuration as TOML to `path`.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.qc.pressure, vec![1, 2]);
        assert_eq!(config.qc.max_pressure, None);
        assert_eq!(config.binning.spatial_degrees, 0.1);
        assert_eq!(config.binning.temporal_days, 1.0);
        assert_eq!(config.derived.dha_range, [10.0, 1000.0]);
        assert_eq!(config.derived.dha_spacing, 0.2);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.qc.max_pressure = Some(2000.0);
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_file_keeps_other_sections() {
        let parsed: Config = toml::from_str("[binning]\nspatial_degrees = 0.5\ntemporal_days = 7.0\n").unwrap();
        assert_eq!(parsed.binning.spatial_degrees, 0.5);
        assert_eq!(parsed.qc, QcConfig::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("argo-config.toml");

        let mut config = Config::default();
        config.qc.salinity = vec![1];
        config.save_to_path(&path).unwrap();

        assert_eq!(Config::load_from_path(&path), config);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "qc = 3").unwrap();
        assert_eq!(Config::load_from_path(&path), Config::default());
    }
}
