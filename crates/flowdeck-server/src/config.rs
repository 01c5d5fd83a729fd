//! Configuration for the Flowdeck server.
//!
//! This module contains the configuration types and loading functionality.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Directory the launcher UI assets are served from
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        // Start with defaults
        let mut config = Self::default();

        // Override from environment variables
        if let Ok(port) = env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                config.port = port;
            } else {
                warn!("Invalid PORT value: {}", port);
            }
        }

        if let Ok(host) = env::var("HOST") {
            config.bind_address = host;
        }

        if let Ok(static_dir) = env::var("FLOWDECK_STATIC_DIR") {
            config.static_dir = static_dir;
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        // Validate required fields
        if config.bind_address.is_empty() {
            return Err(ServerError::ConfigError(
                "Bind address is required".to_string(),
            ));
        }

        if config.static_dir.is_empty() {
            return Err(ServerError::ConfigError(
                "Static directory is required".to_string(),
            ));
        }

        info!("Loaded server configuration");
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_host(),
            static_dir: default_static_dir(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = temp_env::with_vars(
            [
                ("PORT", None::<&str>),
                ("HOST", None),
                ("FLOWDECK_STATIC_DIR", None),
                ("LOG_LEVEL", None),
            ],
            || ServerConfig::load().unwrap(),
        );

        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_env_overrides() {
        let config = temp_env::with_vars(
            [
                ("PORT", Some("8123")),
                ("HOST", Some("127.0.0.1")),
                ("FLOWDECK_STATIC_DIR", Some("assets")),
                ("LOG_LEVEL", Some("debug")),
            ],
            || ServerConfig::load().unwrap(),
        );

        assert_eq!(config.port, 8123);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.static_dir, "assets");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_port_keeps_default() {
        let config = temp_env::with_vars(
            [("PORT", Some("not-a-port")), ("HOST", None)],
            || ServerConfig::load().unwrap(),
        );

        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_blank_static_dir_is_rejected() {
        let err = temp_env::with_vars([("FLOWDECK_STATIC_DIR", Some(""))], || {
            ServerConfig::load().unwrap_err()
        });

        assert!(matches!(err, ServerError::ConfigError(_)));
    }
}
