//! TOML-based session configuration.
//!
//! Stores the handful of start-up preferences the CLI honours:
//! whether audio cues begin enabled and how often the run loop ticks.
//! Workout state itself is never persisted; a session always starts
//! fresh in `Ready` with a zero set counter.
//!
//! Configuration is stored at `~/.config/setflow/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_true() -> bool {
    true
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

/// Session configuration.
///
/// Serialized to/from TOML at `~/.config/setflow/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Whether audio cues start enabled.
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    /// Run-loop wake-up interval in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            tick_interval_ms: 1_000,
        }
    }
}

impl Config {
    /// Returns `~/.config/setflow/config.toml`, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory exists on this platform
    /// or it cannot be created.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("setflow");
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from `path`, or return the default when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert!(parsed.audio_enabled);
        assert_eq!(parsed.tick_interval_ms, 1_000);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("audio_enabled = false\n").unwrap();
        assert!(!parsed.audio_enabled);
        assert_eq!(parsed.tick_interval_ms, 1_000);
    }

    #[test]
    fn load_returns_default_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config {
            audio_enabled: false,
            tick_interval_ms: 250,
        };
        cfg.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), cfg);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "audio_enabled = \"not a bool\"").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
