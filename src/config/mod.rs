use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://www.4byte.directory/api/v1/signatures/";
pub const DEFAULT_BROWSE_URL: &str = "https://www.4byte.directory/signatures/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Set to false to never contact the signature directory
    pub enabled: bool,
    pub api_url: String,
    pub browse_url: String,
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_API_URL.to_string(),
            browse_url: DEFAULT_BROWSE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `HEXSPLIT_LOG` is unset
    pub level: String,
    pub path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Initial state of the calldata (selector extraction) toggle
    #[serde(default)]
    pub calldata_mode: bool,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .path
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("hexsplit.log")))
    }
}

/// Load the config file, falling back to defaults.
///
/// A missing file is silent; an unreadable or malformed one is logged.
pub fn load(explicit: Option<&Path>) -> Config {
    let Some(path) = explicit.map(Path::to_path_buf).or_else(config_path) else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        Err(err) => {
            tracing::warn!("{err}; using defaults");
            Config::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(content)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("HEXSPLIT_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("hexsplit").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("hexsplit").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "hexsplit", "hexsplit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("hexsplit"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("hexsplit"));
    }
    directories::ProjectDirs::from("io", "hexsplit", "hexsplit")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert!(!config.calldata_mode);
        assert!(config.resolver.enabled);
        assert_eq!(config.resolver.api_url, DEFAULT_API_URL);
        assert_eq!(config.resolver.browse_url, DEFAULT_BROWSE_URL);
        assert_eq!(config.resolver.timeout_secs, 10);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = parse(
            r#"
            calldata_mode = true

            [resolver]
            enabled = false
            timeout_secs = 3

            [log]
            level = "debug"
            path = "/tmp/hexsplit-test.log"
            "#,
        )
        .unwrap();
        assert!(config.calldata_mode);
        assert!(!config.resolver.enabled);
        assert_eq!(config.resolver.timeout_secs, 3);
        assert_eq!(config.resolver.api_url, DEFAULT_API_URL);
        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.log_path(),
            Some(PathBuf::from("/tmp/hexsplit-test.log"))
        );
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(parse("calldata_mode = \"yes\"").is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = load(Some(Path::new("/nonexistent/hexsplit/config.toml")));
        assert!(!config.calldata_mode);
    }
}
