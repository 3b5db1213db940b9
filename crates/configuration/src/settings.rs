use crate::error::ConfigError;
use core_types::CalendarZone;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Where price files live and how they are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one `<SYMBOL><file_suffix>` file per symbol.
    pub directory: PathBuf,
    /// File name suffix that marks a price file, e.g. `_values.csv`.
    pub file_suffix: String,
    /// Calendar zone used to turn epoch timestamps into calendar dates.
    pub zone: CalendarZone,
    /// How long loaded series are reused. Zero re-reads the files on every query.
    pub cache_ttl_secs: u64,
}

/// Network settings for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Logging output. `RUST_LOG` takes precedence over `filter` when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

// --- Default Implementations ---
// A missing `config.toml` (or a missing section in it) still yields a
// runnable configuration.

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data/prices"),
            file_suffix: "_values.csv".to_string(),
            zone: CalendarZone::Local,
            cache_ttl_secs: 0,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl DataSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl ServerSettings {
    /// Resolves `host:port` into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "invalid server address '{}:{}': {}",
                    self.host, self.port, e
                ))
            })
    }
}

impl Config {
    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.file_suffix.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data.file_suffix must not be empty".to_string(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.filter must not be empty".to_string(),
            ));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}
