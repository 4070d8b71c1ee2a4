//! Server configuration
//!
//! Layers built-in defaults, an optional `config.toml` and `HW1_*`
//! environment variables, then validates the result.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::client::control::{MAX_COMMAND_LENGTH, READ_CHUNK_SIZE};
use crate::error::ServerError;

/// Base name of the optional configuration file (any format `config` reads).
pub const CONFIG_FILE: &str = "config";

/// Prefix of environment overrides, e.g. `HW1_PORT=2121`.
pub const ENV_PREFIX: &str = "HW1";

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the control listener binds to.
    pub host: String,
    pub port: u16,

    /// Jail root shared by every session.
    pub server_root: String,

    /// Start every session authenticated and skip the login check.
    pub auth_disabled: bool,

    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,

    /// Chunk size for control reads and file copies.
    pub buffer_size: usize,
    pub max_command_length: usize,
    pub max_file_size_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            server_root: ".".to_string(),
            auth_disabled: false,
            connect_timeout_secs: 10,
            idle_timeout_secs: 30,
            buffer_size: READ_CHUNK_SIZE,
            max_command_length: MAX_COMMAND_LENGTH,
            max_file_size_mb: 100,
        }
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (optional) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Same as [`ServerConfig::load`] with an explicit file path or base name.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();

        let settings = Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("server_root", defaults.server_root)?
            .set_default("auth_disabled", defaults.auth_disabled)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .set_default("idle_timeout_secs", defaults.idle_timeout_secs as i64)?
            .set_default("buffer_size", defaults.buffer_size as i64)?
            .set_default("max_command_length", defaults.max_command_length as i64)?
            .set_default("max_file_size_mb", defaults.max_file_size_mb as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.server_root.is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        if self.buffer_size == 0 {
            return Err(ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        if self.connect_timeout_secs == 0 || self.idle_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.max_command_length < 16 {
            return Err(ConfigError::Message(
                "max_command_length must be at least 16".into(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_file_size_mb must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    /// Creates the server root if needed and returns its canonical path.
    pub fn prepare_root(&self) -> Result<PathBuf, ServerError> {
        let root = self.server_root_path();
        std::fs::create_dir_all(&root).map_err(|e| ServerError::Root(root.clone(), e))?;
        root.canonicalize().map_err(|e| ServerError::Root(root, e))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get maximum file size in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.control_socket(), "127.0.0.1:7777");
        assert_eq!(config.max_file_size_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ServerConfig {
            port: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            idle_timeout_secs: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            buffer_size: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ftp.toml");
        std::fs::write(
            &path,
            "port = 2121\nauth_disabled = true\nserver_root = \"/srv/ftp\"\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.port, 2121);
        assert!(config.auth_disabled);
        assert_eq!(config.server_root, "/srv/ftp");
        assert_eq!(config.buffer_size, READ_CHUNK_SIZE);
    }

    #[test]
    fn test_prepare_root_creates_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("a/b");
        let config = ServerConfig {
            server_root: root.to_string_lossy().into_owned(),
            ..ServerConfig::default()
        };
        let prepared = config.prepare_root().unwrap();
        assert!(prepared.is_dir());
        assert!(prepared.is_absolute());
    }
}
