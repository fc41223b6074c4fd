//! # fdfs-tracker
//!
//! Blocking client for the FastDFS tracker protocol:
//! - Resolves the storage server for an upload, download or update
//! - Lists group and storage-server statistics
//! - Removes a storage server from every tracker of a cluster
//! - Round-robin tracker selection with failover
//!
//! File transfer itself happens against the resolved storage server and is
//! not part of this crate.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TrackerClient                           │
//! │         (store / fetch / update / stats / delete)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     TrackerGroup                             │
//! │          (round-robin cursor, failover, by index)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐          ┌─────────────┐
//!               │   Tracker     │─────────▶│  Protocol   │
//!               │  Connection   │          │   Codec     │
//!               └───────────────┘          └──────┬──────┘
//!                                                 │
//!                                                 ▼
//!                                          ┌─────────────┐
//!                                          │  Stat       │
//!                                          │  Records    │
//!                                          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use fdfs_tracker::{ClientConfig, TrackerClient, TrackerEndpoint, TrackerReply};
//!
//! # fn main() -> fdfs_tracker::Result<()> {
//! let config = ClientConfig::builder()
//!     .tracker(TrackerEndpoint::new("192.168.0.10", 22122))
//!     .build()?;
//! let mut client = TrackerClient::from_config(&config)?;
//!
//! match client.resolve_fetch_target_by_id(None, "group1/M00/00/00/abc.jpg")? {
//!     TrackerReply::Ok(server) => println!("download from {}", server),
//!     TrackerReply::Status(code) => println!("tracker said {}", code),
//! }
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod stat;
pub mod types;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{TrackerError, Result};
pub use config::{ClientConfig, TrackerEndpoint};
pub use client::{TrackerClient, TrackerReply};
pub use network::{TrackerConnection, TrackerGroup};
pub use protocol::{StatusCode, StorageStatus};
pub use types::{FileId, ServerInfo, StorageServer};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of fdfs-tracker
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
