//! Bootstrap configuration
//!
//! Sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`ARTISTDB_*`, read by the binary's CLI parser)
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! Everything here is read once at startup; a restart picks up changes.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_INPUT_FILE: &str = "artists.txt";
pub const DEFAULT_DATABASE_PATH: &str = "sqlite.db";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_AVATAR_DIR: &str = "avatars";

/// Lowest port accepted for the HTTP listener
pub const MIN_PORT: u16 = 1024;

/// Contents of `config.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Artist source file
    #[serde(default = "default_input_file")]
    pub input_file: PathBuf,

    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/avatar`
    #[serde(default = "default_avatar_dir")]
    pub avatar_dir: PathBuf,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            input_file: default_input_file(),
            database_path: default_database_path(),
            port: default_port(),
            avatar_dir: default_avatar_dir(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_input_file() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_FILE)
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_avatar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_AVATAR_DIR)
}

fn default_log_level() -> String {
    "info".to_string()
}

/// `<config dir>/artistdb/config.toml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("artistdb").join("config.toml"))
}

/// Load the TOML file
///
/// `path` falls back to [`default_config_path`]. A missing file is not an
/// error; defaults are used. A file that exists but does not parse is.
pub fn load_toml(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!("Config file {} not found, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let toml_str = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

    let config: TomlConfig = toml::from_str(&toml_str)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub avatar_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Resolved bootstrap configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_file: PathBuf,
    pub database_path: PathBuf,
    pub port: u16,
    pub avatar_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Apply overrides on top of the file values
    pub fn resolve(file: TomlConfig, overrides: ConfigOverrides) -> Self {
        Self {
            input_file: overrides.input_file.unwrap_or(file.input_file),
            database_path: overrides.database_path.unwrap_or(file.database_path),
            port: overrides.port.unwrap_or(file.port),
            avatar_dir: overrides.avatar_dir.unwrap_or(file.avatar_dir),
            log_level: overrides.log_level.unwrap_or(file.logging.level),
        }
    }

    /// Load the TOML file and resolve against the overrides
    pub fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let file = load_toml(config_path)?;
        Ok(Self::resolve(file, overrides))
    }

    pub fn validate(&self) -> Result<()> {
        if self.port < MIN_PORT {
            return Err(Error::Config(format!(
                "Port {} out of range ({}-{})",
                self.port,
                MIN_PORT,
                u16::MAX
            )));
        }

        if !self.input_file.exists() {
            return Err(Error::Config(format!(
                "Input file {} does not exist",
                self.input_file.display()
            )));
        }
        if self.input_file.is_dir() {
            return Err(Error::Config(format!(
                "Input file {} is a directory",
                self.input_file.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.input_file, PathBuf::from("artists.txt"));
        assert_eq!(config.database_path, PathBuf::from("sqlite.db"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.avatar_dir, PathBuf::from("avatars"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("port = 9000\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.input_file, PathBuf::from("artists.txt"));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_toml(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(load_toml(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn test_default_path_follows_config_dir() {
        let tmp = TempDir::new().unwrap();
        let old = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", tmp.path());

        let dir = tmp.path().join("artistdb");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "database_path = \"/data/artists.db\"\n").unwrap();

        let loaded = load_toml(None);

        match old {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }

        if cfg!(target_os = "linux") {
            assert_eq!(loaded.unwrap().database_path, PathBuf::from("/data/artists.db"));
        }
    }

    #[test]
    fn test_overrides_take_priority() {
        let file: TomlConfig = toml::from_str("port = 9000\ninput_file = \"file.txt\"\n").unwrap();
        let overrides = ConfigOverrides {
            port: Some(9100),
            log_level: Some("warn".into()),
            ..Default::default()
        };

        let config = Config::resolve(file, overrides);
        assert_eq!(config.port, 9100);
        assert_eq!(config.input_file, PathBuf::from("file.txt"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_validate() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("artists.txt");
        std::fs::write(&input, "").unwrap();

        let mut config = Config::resolve(
            TomlConfig::default(),
            ConfigOverrides { input_file: Some(input), ..Default::default() },
        );
        assert!(config.validate().is_ok());

        config.port = 80;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.port = DEFAULT_PORT;

        config.input_file = tmp.path().join("missing.txt");
        assert!(config.validate().is_err());

        config.input_file = tmp.path().to_path_buf();
        assert!(config.validate().is_err());
    }
}
