use std::path::PathBuf;

use clap::Subcommand;
use setflow_core::{Config, ConfigError, CoreError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current config as JSON
    Show {
        /// Config file path (defaults to ~/.config/setflow/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Set config values
    Set {
        /// Whether audio cues start enabled
        #[arg(long)]
        audio: Option<bool>,
        /// Run-loop wake-up interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Reset config to defaults
    Reset {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path),
        None => Config::default_path(),
    }
}

pub fn run(action: ConfigAction) -> Result<(), CoreError> {
    match action {
        ConfigAction::Show { config } => {
            let path = config_path(config)?;
            let cfg = Config::load(&path)?;
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
        ConfigAction::Set {
            audio,
            tick_ms,
            config,
        } => {
            let path = config_path(config)?;
            let mut cfg = Config::load(&path)?;
            if let Some(audio) = audio {
                cfg.audio_enabled = audio;
            }
            if let Some(tick_ms) = tick_ms {
                cfg.tick_interval_ms = tick_ms;
            }
            cfg.save(&path)?;
            println!("ok");
        }
        ConfigAction::Reset { config } => {
            let path = config_path(config)?;
            Config::default().save(&path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_show_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run(ConfigAction::Set {
            audio: Some(false),
            tick_ms: Some(500),
            config: Some(path.clone()),
        })
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert!(!cfg.audio_enabled);
        assert_eq!(cfg.tick_interval_ms, 500);
    }

    #[test]
    fn reset_restores_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run(ConfigAction::Set {
            audio: Some(false),
            tick_ms: None,
            config: Some(path.clone()),
        })
        .unwrap();
        run(ConfigAction::Reset {
            config: Some(path.clone()),
        })
        .unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn show_surfaces_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tick_interval_ms = \"soon\"").unwrap();

        let err = run(ConfigAction::Show { config: Some(path) }).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseFailed(_))));
    }
}
