//! Tracker Connection Group
//!
//! The configured tracker servers plus a round-robin cursor. Shared between
//! clients (and threads) behind an `Arc`; the cursor is the only mutable
//! state and is updated atomically.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::TrackerConnection;
use crate::config::{ClientConfig, TrackerEndpoint};
use crate::error::{Result, TrackerError};
use crate::protocol::Charset;

/// Ordered set of tracker servers with a rotating selection cursor
#[derive(Debug)]
pub struct TrackerGroup {
    /// Tracker servers in configured order (never empty)
    endpoints: Vec<TrackerEndpoint>,

    /// Index handed out by the next round-robin selection
    cursor: AtomicUsize,

    connect_timeout: Duration,
    network_timeout: Duration,
    charset: Charset,
}

impl TrackerGroup {
    /// Build a group from a validated config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        if config.trackers.is_empty() {
            return Err(TrackerError::Config(
                "tracker group needs at least one tracker".to_string(),
            ));
        }

        Ok(Self {
            endpoints: config.trackers.clone(),
            cursor: AtomicUsize::new(0),
            connect_timeout: config.connect_timeout,
            network_timeout: config.network_timeout,
            charset: config.charset,
        })
    }

    /// Number of configured trackers
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True when no trackers are configured
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn endpoints(&self) -> &[TrackerEndpoint] {
        &self.endpoints
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn network_timeout(&self) -> Duration {
        self.network_timeout
    }

    /// Open a connection to the tracker at `index`
    pub fn connect(&self, index: usize) -> Result<TrackerConnection> {
        let endpoint = self.endpoints.get(index).ok_or_else(|| {
            TrackerError::Config(format!(
                "tracker index {} out of range (group has {})",
                index,
                self.endpoints.len()
            ))
        })?;
        TrackerConnection::open(endpoint, self.connect_timeout, self.network_timeout)
    }

    /// Open a connection to the next tracker in round-robin order
    ///
    /// When the selected tracker cannot be reached the others are tried in
    /// configured order, and the cursor moves past the one that answered.
    pub fn connect_next(&self) -> Result<TrackerConnection> {
        let len = self.endpoints.len();
        let current = self.advance();

        let first_error = match self.connect(current) {
            Ok(conn) => return Ok(conn),
            Err(e) => e,
        };
        if len == 1 {
            return Err(first_error);
        }
        tracing::warn!(
            "Tracker {} unreachable, trying the others: {}",
            self.endpoints[current],
            first_error
        );

        for index in (0..len).filter(|&i| i != current) {
            match self.connect(index) {
                Ok(conn) => {
                    // Only move the cursor if nobody else has since
                    let _ = self.cursor.compare_exchange(
                        (current + 1) % len,
                        (index + 1) % len,
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                    );
                    tracing::info!(
                        "Failed over from tracker {} to {}",
                        self.endpoints[current],
                        self.endpoints[index]
                    );
                    return Ok(conn);
                }
                Err(e) => {
                    tracing::warn!("Tracker {} unreachable: {}", self.endpoints[index], e);
                }
            }
        }

        Err(TrackerError::NoTrackerAvailable { attempted: len })
    }

    /// Take the cursor's index and advance it, wrapping at the group size
    fn advance(&self) -> usize {
        let len = self.endpoints.len();
        match self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
        {
            Ok(previous) | Err(previous) => previous,
        }
    }
}
