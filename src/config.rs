//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `light-sensor.toml`.
//!     loads configuration from file or falls back to defaults.
//!
//! structure:
//!     - ServerConfig: Where the http listener binds (defaults to 0.0.0.0:5000).
//!     - StorageConfig: Path of the sqlite file holding the readings.
//!     - LoggingConfig: Default log level and per-reading logging toggle.
//!
//! every section is optional; a missing file reproduces the fixed defaults
//! the sensor firmware expects (port 5000, light_sensor.db).
//!
//! ==============================================================================

use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 5000 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { db_path: PathBuf::from("light_sensor.db") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), show_sensor_data: false }
    }
}

impl ServerConfig {
    /// socket address the listener binds to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.bind_address, self.port))
    }
}

impl HostConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from toml text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load with default fallback
    ///
    /// runs before the tracing subscriber exists (the log level lives in this
    /// file), so problems are reported on stdout like the rest of the banner.
    pub fn load_or_default() -> Self {
        let paths = [
            PathBuf::from("config").join("light-sensor.toml"),
            PathBuf::from("..").join("config").join("light-sensor.toml"),
        ];

        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {:#}", path.display(), e);
                    }
                }
            }
        }

        println!("[CONFIG] Warning: No config file found - using defaults");
        Self::default()
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        println!("┌─────────────────────────────────────────┐");
        println!("│           HOST CONFIGURATION            │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Listen: {}:{}", self.server.bind_address, self.server.port);
        println!("│ Database: {}", self.storage.db_path.display());
        println!("│ Log Level: {}", self.logging.level);
        println!("│ Log Readings: {}", self.logging.show_sensor_data);
        println!("└─────────────────────────────────────────┘");
    }
}
