use std::{fs, io, path::Path};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_FADE_LENGTH, DEFAULT_FADED_IN_VOLUME, MAX_FADE_LENGTH, MAX_FADED_IN_VOLUME,
    MIN_FADE_LENGTH, MIN_FADED_IN_VOLUME,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Fade tunables. Missing keys in a config file fall back to the defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FadeConfig {
    /// Seconds, used when a fade request carries no usable duration
    pub default_fade_length: f64,
    /// Ceiling volume for fade-in and unpause
    pub faded_in_volume: f32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            default_fade_length: DEFAULT_FADE_LENGTH,
            faded_in_volume: DEFAULT_FADED_IN_VOLUME,
        }
    }
}

impl FadeConfig {
    pub fn new(default_fade_length: f64, faded_in_volume: f32) -> Result<Self, ConfigError> {
        let config = Self {
            default_fade_length,
            faded_in_volume,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the recommended bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FADE_LENGTH..=MAX_FADE_LENGTH).contains(&self.default_fade_length) {
            return Err(ConfigError::OutOfRange {
                field: "default_fade_length",
                value: self.default_fade_length,
                min: MIN_FADE_LENGTH,
                max: MAX_FADE_LENGTH,
            });
        }
        if !(MIN_FADED_IN_VOLUME..=MAX_FADED_IN_VOLUME).contains(&self.faded_in_volume) {
            return Err(ConfigError::OutOfRange {
                field: "faded_in_volume",
                value: f64::from(self.faded_in_volume),
                min: f64::from(MIN_FADED_IN_VOLUME),
                max: f64::from(MAX_FADED_IN_VOLUME),
            });
        }
        Ok(())
    }

    // If no file is found, returns default config instead of error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(error) => return Err(ConfigError::Io(error)),
        };

        let config: Self = toml::from_str(&contents).map_err(|error| ConfigError::Parse {
            filename: path.display().to_string(),
            message: error.to_string(),
        })?;
        config.validate()?;

        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FadeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_fade_length, DEFAULT_FADE_LENGTH);
        assert_eq!(config.faded_in_volume, DEFAULT_FADED_IN_VOLUME);
    }

    #[test]
    fn test_new_rejects_out_of_range_values() {
        assert!(matches!(
            FadeConfig::new(0.001, 1.0),
            Err(ConfigError::OutOfRange {
                field: "default_fade_length",
                ..
            })
        ));
        assert!(matches!(
            FadeConfig::new(6.0, 1.0),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            FadeConfig::new(1.0, 0.0),
            Err(ConfigError::OutOfRange {
                field: "faded_in_volume",
                ..
            })
        ));
        assert!(FadeConfig::new(0.01, 0.01).is_ok());
        assert!(FadeConfig::new(5.0, 1.0).is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FadeConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, FadeConfig::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fade.toml");
        fs::write(&path, "faded_in_volume = 0.5\n").unwrap();

        let config = FadeConfig::load(&path).unwrap();
        assert_eq!(config.faded_in_volume, 0.5);
        assert_eq!(config.default_fade_length, DEFAULT_FADE_LENGTH);
    }

    #[test]
    fn test_malformed_file_reports_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "default_fade_length = [").unwrap();

        match FadeConfig::load(&path) {
            Err(ConfigError::Parse { filename, .. }) => assert!(filename.ends_with("broken.toml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_loaded_values_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fade.toml");
        fs::write(&path, "default_fade_length = 10.0\n").unwrap();

        assert!(matches!(
            FadeConfig::load(&path),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fade.toml");
        let config = FadeConfig::new(2.5, 0.75).unwrap();

        config.save(&path).unwrap();
        assert_eq!(FadeConfig::load(&path).unwrap(), config);
    }
}
