//! Configuration for recordhub
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{HubError, Result};

/// Main configuration for a recordhub server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory of the persistent database.
    /// `None` keeps both tables in memory for the lifetime of the process.
    pub data_dir: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Size of the single receive that reads a request (bytes)
    pub max_request_size: usize,

    /// Max concurrent connection handlers, `None` for unbounded
    pub max_connections: Option<usize>,

    /// Connection read timeout (milliseconds, 0 disables it)
    pub read_timeout_ms: u64,

    /// Write timeout applied to subscriber connections (milliseconds, 0 disables it)
    pub subscriber_write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            listen_addr: "127.0.0.1:8080".to_string(),
            max_request_size: 4096,
            max_connections: None,
            read_timeout_ms: 0,
            subscriber_write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the values that would make the server unusable
    pub fn validate(&self) -> Result<()> {
        if self.max_request_size == 0 {
            return Err(HubError::Config(
                "max_request_size must be greater than zero".to_string(),
            ));
        }
        if self.max_connections == Some(0) {
            return Err(HubError::Config(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Persist records and audit entries under the given directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(path.into());
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the request receive size (in bytes)
    pub fn max_request_size(mut self, size: usize) -> Self {
        self.config.max_request_size = size;
        self
    }

    /// Limit the number of concurrent connection handlers
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = Some(count);
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the subscriber write timeout (in milliseconds)
    pub fn subscriber_write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.subscriber_write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
