//! pingpong configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::play::PlayConfig;
use crate::sink::SinkKind;

/// Main pingpong configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Round budget and queue sizing
    pub play: PlayConfig,

    /// Where play lines are written
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .pingpong.yml
        let local_config = PathBuf::from(".pingpong.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/pingpong/pingpong.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pingpong").join("pingpong.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sink used by the `pp` binary
    pub sink: SinkKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.play.max_iterations, 10);
        assert_eq!(config.play.mailbox_capacity, 1);
        assert_eq!(config.output.sink, SinkKind::Console);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
play:
  max-iterations: 3
  mailbox-capacity: 2

output:
  sink: log
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.play.max_iterations, 3);
        assert_eq!(config.play.mailbox_capacity, 2);
        assert_eq!(config.output.sink, SinkKind::Log);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
play:
  max-iterations: 7
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.play.max_iterations, 7);

        // Defaults for unspecified
        assert_eq!(config.play.mailbox_capacity, 1);
        assert_eq!(config.output.sink, SinkKind::Console);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "play:\n  max-iterations: 4").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.play.max_iterations, 4);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");

        let err = Config::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_kebab_keys() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("max-iterations: 10"));
        assert!(yaml.contains("sink: console"));
    }
}
