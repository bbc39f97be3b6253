//! Configuration loading for the pilot client.

use embassy_time::Duration;
use serde::Deserialize;
use std::path::Path;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Connection and pacing settings.
///
/// Every key is optional in the TOML file; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct FlightConfig {
    /// Simulator host name or address
    pub host: String,
    /// Simulator WebSocket port
    pub port: u16,
    /// Request path of the WebSocket endpoint
    pub path: String,
    /// Delay after each sent command before the next receive (ms)
    pub tick_interval_ms: u64,
    /// How often to poll the socket while waiting for a frame (ms)
    pub poll_interval_ms: u64,
    /// Log level for this crate (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8765,
            path: "/".to_string(),
            tick_interval_ms: 250,
            poll_interval_ms: 10,
            log_level: "info".to_string(),
        }
    }
}

impl FlightConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the config.toml file
    ///
    /// # Returns
    /// * `Ok(FlightConfig)` if the file was successfully loaded and parsed
    /// * `Err(String)` with a descriptive error message otherwise
    pub fn load(config_path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(config_path).map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    /// Like [`FlightConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(config_path: &Path) -> Result<Self, String> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// WebSocket URL of the simulator endpoint.
    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') { self.path.clone() } else { format!("/{}", self.path) };
        format!("ws://{}:{}{}", self.host, self.port, path)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parsed log level, `Info` when the configured value is not recognised.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
