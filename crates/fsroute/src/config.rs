// File: src/config.rs
// Purpose: Configuration parsing from fsroute.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::convention::{Convention, DEFAULT_EXTENSION};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "fsroute.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory scanned for route files (default: "routes")
    #[serde(default = "default_routes_dir")]
    pub routes_dir: String,

    /// Extension of route files, without the dot (default: "rs")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Reserved; recorded on the route table only
    #[serde(default)]
    pub absolute: bool,
}

/// Errors reading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// Default values
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_routes_dir() -> String {
    "routes".to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            routes_dir: default_routes_dir(),
            extension: default_extension(),
            absolute: false,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `fsroute.toml` from the working directory, or defaults if it is absent
    pub fn load_default() -> Result<Self, ConfigError> {
        if Path::new(CONFIG_FILE).exists() {
            Self::load(CONFIG_FILE)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `FSROUTE_ROUTES_DIR` and `FSROUTE_PORT` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var("FSROUTE_ROUTES_DIR").ok(),
            std::env::var("FSROUTE_PORT").ok(),
        );
    }

    fn apply_overrides(&mut self, routes_dir: Option<String>, port: Option<String>) {
        if let Some(routes_dir) = routes_dir.filter(|dir| !dir.is_empty()) {
            self.routing.routes_dir = routes_dir;
        }
        if let Some(port) = port.and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// `host:port` to bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Naming convention for the configured extension
    pub fn convention(&self) -> Convention {
        Convention::new(&self.routing.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.routing.routes_dir, "routes");
        assert_eq!(config.routing.extension, "rs");
        assert!(!config.routing.absolute);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [server]
            port = 8080

            [routing]
            routes_dir = "api"
            extension = "toml"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.routing.routes_dir, "api");
        assert_eq!(config.convention().index_name(), "index.toml");
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml("[server]\nport = \"eighty\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(Some("handlers".to_string()), Some("9000".to_string()));
        assert_eq!(config.routing.routes_dir, "handlers");
        assert_eq!(config.address(), "127.0.0.1:9000");

        // Unparseable and empty values are ignored
        config.apply_overrides(Some(String::new()), Some("port".to_string()));
        assert_eq!(config.routing.routes_dir, "handlers");
        assert_eq!(config.server.port, 9000);
    }
}
