//! TOML configuration for registry access, storage and logging.
//!
//! # Invariants
//! - Every section and key has a default; an empty file is a valid config.
//! - `registry.url` is non-blank and `registry.timeout_secs` is positive.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Published OCC RBDMS well snapshot.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://oklahoma.gov/content/dam/ok/en/occ/documents/og/ogdatafiles/rbdms-wells.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_DB_FILE: &str = "wellsync.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "config parse error: {err}"),
            Self::Invalid(message) => write!(f, "config validation error: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WellsyncConfig {
    pub registry: RegistryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REGISTRY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Relative paths resolve against the process working directory.
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `None` uses `logging::default_log_level()`.
    pub level: Option<String>,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub dir: Option<PathBuf>,
}

impl WellsyncConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.url.trim().is_empty() {
            return Err(ConfigError::Invalid("registry.url must not be blank".into()));
        }
        if self.registry.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "registry.timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Reads and validates a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<WellsyncConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    WellsyncConfig::from_toml_str(&content)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<WellsyncConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(WellsyncConfig::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = WellsyncConfig::from_toml_str("").unwrap();
        assert_eq!(config, WellsyncConfig::default());
        assert_eq!(config.registry.url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.registry.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = WellsyncConfig::from_toml_str(
            r#"
[registry]
timeout_secs = 30

[logging]
level = "debug"
dir = "/var/log/wellsync"
"#,
        )
        .unwrap();
        assert_eq!(config.registry.url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.registry.timeout_secs, 30);
        assert_eq!(config.storage.db_path, PathBuf::from("wellsync.sqlite3"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = WellsyncConfig::from_toml_str("[registry]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WellsyncConfig::from_toml_str("[registry]\nurll = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WellsyncConfig::default());
        assert!(matches!(
            load_config(dir.path().join("absent.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
