//! Error types for fdfs-tracker
//!
//! Transport-level failures only. Outcomes reported by a tracker through the
//! status byte travel as [`TrackerReply::Status`](crate::client::TrackerReply)
//! instead and never show up here.

use thiserror::Error;

use crate::protocol::StatusCode;

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Transport-level error for tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Read from tracker {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("Connection to tracker {0} is closed")]
    ConnectionClosed(String),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to tracker {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No tracker reachable ({attempted} tried)")]
    NoTrackerAvailable { attempted: usize },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Status code recorded as the client's last error when this failure
    /// ends a call.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackerError::Connect { .. } | TrackerError::NoTrackerAvailable { .. } => {
                StatusCode::ECONNREFUSED
            }
            TrackerError::Protocol(_) | TrackerError::InvalidData(_) | TrackerError::Config(_) => {
                StatusCode::EINVAL
            }
            TrackerError::Io(_) | TrackerError::Timeout { .. } | TrackerError::ConnectionClosed(_) => {
                StatusCode::EIO
            }
        }
    }

    /// True when the error was caused by the read timeout firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TrackerError::Timeout { .. })
    }
}
