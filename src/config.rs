//! Configuration for fdfs-tracker
//!
//! One immutable value, built once and handed to every
//! [`TrackerGroup`](crate::network::TrackerGroup). Can be assembled in code
//! through [`ConfigBuilder`] or loaded from a TOML file.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TrackerError};
use crate::protocol::Charset;

/// Default connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default network (read/write) timeout in seconds
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 30;

/// Address of one tracker server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackerEndpoint {
    pub address: String,
    pub port: u16,
}

impl TrackerEndpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for TrackerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

impl FromStr for TrackerEndpoint {
    type Err = TrackerError;

    /// Parse `host:port`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| TrackerError::Config(format!("tracker '{}' is not host:port", s)))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(TrackerError::Config(format!("tracker '{}' has no host", s)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| TrackerError::Config(format!("tracker '{}' has a bad port: {}", s, e)))?;
        Ok(Self::new(host, port))
    }
}

/// Client configuration shared by all tracker connections
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Cluster
    // -------------------------------------------------------------------------
    /// Tracker servers, in configured order. Never empty once built.
    pub trackers: Vec<TrackerEndpoint>,

    // -------------------------------------------------------------------------
    // Network
    // -------------------------------------------------------------------------
    /// Bound on socket establishment
    pub connect_timeout: Duration,

    /// Bound on every blocking read and write
    pub network_timeout: Duration,

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------
    /// Charset for group names, file names and addresses on the wire
    pub charset: Charset,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            trackers: Vec::new(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            network_timeout: Duration::from_secs(DEFAULT_NETWORK_TIMEOUT_SECS),
            charset: Charset::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!("Loading tracker configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(content)
            .map_err(|e| TrackerError::Config(format!("invalid configuration: {}", e)))?;
        file.into_config()
    }
}

/// On-disk shape of the configuration
///
/// ```toml
/// connect_timeout = 5
/// network_timeout = 30
/// charset = "ISO8859-1"
///
/// [[trackers]]
/// ip = "192.168.0.10"
/// port = 22122
/// ```
#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    connect_timeout: i64,

    #[serde(default)]
    network_timeout: i64,

    #[serde(default)]
    charset: Option<String>,

    #[serde(default)]
    trackers: Vec<FileTracker>,
}

#[derive(Debug, Deserialize)]
struct FileTracker {
    ip: String,
    port: u16,
}

impl FileConfig {
    fn into_config(self) -> Result<ClientConfig> {
        // Non-positive timeouts fall back to the defaults
        let connect_secs = if self.connect_timeout > 0 {
            self.connect_timeout as u64
        } else {
            DEFAULT_CONNECT_TIMEOUT_SECS
        };
        let network_secs = if self.network_timeout > 0 {
            self.network_timeout as u64
        } else {
            DEFAULT_NETWORK_TIMEOUT_SECS
        };

        let charset = match self.charset.as_deref().map(str::trim) {
            None | Some("") => Charset::default(),
            Some(name) => name.parse()?,
        };

        ClientConfig::builder()
            .trackers(
                self.trackers
                    .into_iter()
                    .map(|t| TrackerEndpoint::new(t.ip.trim(), t.port)),
            )
            .connect_timeout(Duration::from_secs(connect_secs))
            .network_timeout(Duration::from_secs(network_secs))
            .charset(charset)
            .build()
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: ClientConfig,
}

impl ConfigBuilder {
    /// Append one tracker endpoint
    pub fn tracker(mut self, endpoint: TrackerEndpoint) -> Self {
        self.config.trackers.push(endpoint);
        self
    }

    /// Append several tracker endpoints, keeping their order
    pub fn trackers(mut self, endpoints: impl IntoIterator<Item = TrackerEndpoint>) -> Self {
        self.config.trackers.extend(endpoints);
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the network (read/write) timeout
    pub fn network_timeout(mut self, timeout: Duration) -> Self {
        self.config.network_timeout = timeout;
        self
    }

    /// Set the wire charset
    pub fn charset(mut self, charset: Charset) -> Self {
        self.config.charset = charset;
        self
    }

    /// Validate and return the config. At least one tracker is required.
    pub fn build(self) -> Result<ClientConfig> {
        if self.config.trackers.is_empty() {
            return Err(TrackerError::Config(
                "at least one tracker server is required".to_string(),
            ));
        }
        if self.config.connect_timeout.is_zero() {
            return Err(TrackerError::Config("connect timeout must be positive".to_string()));
        }
        Ok(self.config)
    }
}
