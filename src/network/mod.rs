//! Network Module
//!
//! Blocking TCP connections to tracker servers.
//!
//! ## Model
//! - One short-lived connection per logical request
//! - Connect bounded by the connect timeout, each read/write by the network
//!   timeout
//! - Round-robin selection across the configured trackers, with failover

mod connection;
mod group;

pub use connection::TrackerConnection;
pub use group::TrackerGroup;
