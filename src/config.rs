//! Configuration for the layout placer
//!
//! The definitions directory is resolved once at startup, in order of
//! precedence: explicit override, the `LAYOUT_DEFINITIONS_DIR` environment
//! value, a config file value, then the compiled-in default.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::placement::pacing_from_secs;

/// Environment variable naming the definitions directory
pub const DEFINITIONS_DIR_ENV: &str = "LAYOUT_DEFINITIONS_DIR";

/// Definitions directory used when nothing else is configured
pub const DEFAULT_DEFINITIONS_DIR: &str = "layouts";

/// Pause between placement calls. The scene service already throttles each
/// command slightly; this keeps it stable through long runs of 14-26 parts.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(100);

/// Prefix for placed instance names
pub const DEFAULT_NAME_PREFIX: &str = "Hab";

/// Errors that can occur when loading a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for placing layouts
#[derive(Debug, Clone, PartialEq)]
pub struct PlacerConfig {
    /// Directory holding `variation_<key>.json` definitions
    pub definitions_dir: PathBuf,

    /// Default pause between successive placement calls
    pub pacing_delay: Duration,

    /// Default prefix for placed instance names
    pub name_prefix: String,
}

/// TOML structure for deserializing config files
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    definitions_dir: Option<PathBuf>,
    pacing_delay_secs: Option<f64>,
    name_prefix: Option<String>,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from(DEFAULT_DEFINITIONS_DIR),
            pacing_delay: DEFAULT_PACING_DELAY,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

impl PlacerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(dir) = parsed.definitions_dir {
            config.definitions_dir = dir;
        }
        if let Some(secs) = parsed.pacing_delay_secs {
            config.pacing_delay = pacing_from_secs(secs);
        }
        if let Some(prefix) = parsed.name_prefix {
            config.name_prefix = prefix;
        }
        Ok(config)
    }

    /// Apply the override and the process environment to the definitions directory.
    ///
    /// The environment is read once, here.
    pub fn with_environment(self, override_dir: Option<&Path>) -> Self {
        let env_value = std::env::var_os(DEFINITIONS_DIR_ENV);
        let dir = resolve_definitions_dir(override_dir, env_value, Some(&self.definitions_dir));
        self.with_definitions_dir(dir)
    }

    /// Set the definitions directory
    pub fn with_definitions_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.definitions_dir = dir.into();
        self
    }

    /// Set the default pacing delay
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    /// Set the default instance name prefix
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }
}

/// Pick the definitions directory: override > environment > configured > default.
///
/// Empty values are treated as unset.
pub fn resolve_definitions_dir(
    override_dir: Option<&Path>,
    env_value: Option<OsString>,
    configured: Option<&Path>,
) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_value.filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = configured.filter(|d| !d.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }
    PathBuf::from(DEFAULT_DEFINITIONS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlacerConfig::default();
        assert_eq!(config.definitions_dir, PathBuf::from("layouts"));
        assert_eq!(config.pacing_delay, Duration::from_millis(100));
        assert_eq!(config.name_prefix, "Hab");
    }

    #[test]
    fn test_builder_pattern() {
        let config = PlacerConfig::new()
            .with_definitions_dir("/data/habs")
            .with_pacing_delay(Duration::ZERO)
            .with_name_prefix("Camp");

        assert_eq!(config.definitions_dir, PathBuf::from("/data/habs"));
        assert_eq!(config.pacing_delay, Duration::ZERO);
        assert_eq!(config.name_prefix, "Camp");
    }

    #[test]
    fn test_from_toml() {
        let config = PlacerConfig::from_str(
            r#"
            definitions_dir = "assets/habs"
            pacing_delay_secs = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.definitions_dir, PathBuf::from("assets/habs"));
        assert_eq!(config.pacing_delay, Duration::from_millis(250));
        assert_eq!(config.name_prefix, "Hab");
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        let err = PlacerConfig::from_str("spawn_delay = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let config = PlacerConfig::from_str("pacing_delay_secs = -2.0").unwrap();
        assert_eq!(config.pacing_delay, Duration::ZERO);
    }

    #[test]
    fn test_directory_precedence() {
        let over = Path::new("/override");
        let conf = Path::new("/configured");
        let env = Some(OsString::from("/from-env"));

        assert_eq!(
            resolve_definitions_dir(Some(over), env.clone(), Some(conf)),
            PathBuf::from("/override")
        );
        assert_eq!(
            resolve_definitions_dir(None, env.clone(), Some(conf)),
            PathBuf::from("/from-env")
        );
        assert_eq!(
            resolve_definitions_dir(None, None, Some(conf)),
            PathBuf::from("/configured")
        );
        assert_eq!(
            resolve_definitions_dir(None, None, None),
            PathBuf::from(DEFAULT_DEFINITIONS_DIR)
        );
    }

    #[test]
    fn test_empty_values_are_unset() {
        assert_eq!(
            resolve_definitions_dir(Some(Path::new("")), Some(OsString::new()), None),
            PathBuf::from(DEFAULT_DEFINITIONS_DIR)
        );
    }
}
