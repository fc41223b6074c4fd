//! Tracker Query Client
//!
//! Runs protocol exchanges against the tracker group and reports outcomes on
//! two channels:
//!
//! - `Err(TrackerError)` for transport failures (connect, I/O, timeouts,
//!   malformed frames)
//! - `Ok(TrackerReply::Status(code))` for non-zero status codes returned by
//!   a tracker
//!
//! The code of the most recent call is also kept as the client's last error.
//!
//! ## Connection ownership
//! Every query takes an `Option<&mut TrackerConnection>`:
//! - `None`: the client opens a connection by round-robin and closes it
//!   before returning, whatever the outcome
//! - `Some(conn)`: the caller keeps it across calls; it is closed only when
//!   a transport error leaves it in an unknown state

mod admin;
mod query;
mod reply;

pub use query::{FETCH_BODY_LEN, MAX_STORE_TARGETS, STORE_BODY_LEN};
pub use reply::TrackerReply;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::network::{TrackerConnection, TrackerGroup};
use crate::protocol::{Charset, StatusCode, TrackerCommand};
use crate::types::{FileId, ServerInfo, StorageServer};

/// Client for tracker queries
///
/// Not meant to be shared between threads: every call overwrites the last
/// error. Give each thread its own client over a shared group.
pub struct TrackerClient {
    group: Arc<TrackerGroup>,
    last_error: StatusCode,
}

impl TrackerClient {
    pub fn new(group: Arc<TrackerGroup>) -> Self {
        Self {
            group,
            last_error: StatusCode::OK,
        }
    }

    /// Build a client over a fresh group from `config`
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(TrackerGroup::new(config)?)))
    }

    pub fn group(&self) -> &Arc<TrackerGroup> {
        &self.group
    }

    /// Status code left by the most recent call (`0` on success)
    pub fn last_error(&self) -> StatusCode {
        self.last_error
    }

    /// Open a connection to the next tracker, for callers that want to
    /// reuse one across several queries
    pub fn connect(&self) -> Result<TrackerConnection> {
        self.group.connect_next()
    }

    // =========================================================================
    // Store
    // =========================================================================

    /// Ask which storage server should receive a new file
    ///
    /// With no (or an empty) group the tracker picks the group as well.
    pub fn resolve_store_target(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: Option<&str>,
    ) -> Result<TrackerReply<StorageServer>> {
        self.run(conn, |conn, charset| query::query_store_target(conn, charset, group))
    }

    /// Every storage server able to receive a new file, at most
    /// [`MAX_STORE_TARGETS`]
    pub fn resolve_store_targets(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: Option<&str>,
    ) -> Result<TrackerReply<Vec<StorageServer>>> {
        self.run(conn, |conn, charset| query::query_store_targets(conn, charset, group))
    }

    // =========================================================================
    // Fetch / Update
    // =========================================================================

    /// Storage server to download `filename` from
    pub fn resolve_fetch_target(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: &str,
        filename: &str,
    ) -> Result<TrackerReply<StorageServer>> {
        self.resolve_single(conn, TrackerCommand::QueryFetchOne, group, filename)
    }

    /// Like [`resolve_fetch_target`](Self::resolve_fetch_target) with a
    /// combined `group/filename` id
    pub fn resolve_fetch_target_by_id(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        file_id: &str,
    ) -> Result<TrackerReply<StorageServer>> {
        match FileId::parse(file_id) {
            Ok(id) => self.resolve_fetch_target(conn, id.group, id.filename),
            Err(code) => Ok(self.reject(code)),
        }
    }

    /// Every storage server holding `filename`; the first is the source
    pub fn resolve_fetch_targets(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: &str,
        filename: &str,
    ) -> Result<TrackerReply<Vec<ServerInfo>>> {
        self.run(conn, |conn, charset| {
            query::query_storages(conn, charset, TrackerCommand::QueryFetchAll, group, filename)
        })
    }

    pub fn resolve_fetch_targets_by_id(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        file_id: &str,
    ) -> Result<TrackerReply<Vec<ServerInfo>>> {
        match FileId::parse(file_id) {
            Ok(id) => self.resolve_fetch_targets(conn, id.group, id.filename),
            Err(code) => Ok(self.reject(code)),
        }
    }

    /// Storage server to delete a file on or change its metadata
    pub fn resolve_update_target(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: &str,
        filename: &str,
    ) -> Result<TrackerReply<StorageServer>> {
        self.resolve_single(conn, TrackerCommand::QueryUpdate, group, filename)
    }

    pub fn resolve_update_target_by_id(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        file_id: &str,
    ) -> Result<TrackerReply<StorageServer>> {
        match FileId::parse(file_id) {
            Ok(id) => self.resolve_update_target(conn, id.group, id.filename),
            Err(code) => Ok(self.reject(code)),
        }
    }

    fn resolve_single(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        command: TrackerCommand,
        group: &str,
        filename: &str,
    ) -> Result<TrackerReply<StorageServer>> {
        self.run(conn, |conn, charset| {
            let reply = query::query_storages(conn, charset, command, group, filename)?;
            Ok(reply.map(|mut servers| StorageServer::from(servers.swap_remove(0))))
        })
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Run one exchange, applying the connection ownership rules and
    /// recording the outcome as the last error
    fn run<T>(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        exchange: impl FnOnce(&mut TrackerConnection, Charset) -> Result<TrackerReply<T>>,
    ) -> Result<TrackerReply<T>> {
        let charset = self.group.charset();
        let result = match conn {
            Some(conn) => {
                let result = exchange(conn, charset);
                if let Err(ref e) = result {
                    tracing::debug!("Closing caller connection to {} after: {}", conn.endpoint(), e);
                    conn.close();
                }
                result
            }
            None => match self.group.connect_next() {
                Ok(mut conn) => {
                    let result = exchange(&mut conn, charset);
                    conn.close();
                    result
                }
                Err(e) => Err(e),
            },
        };
        self.record(result)
    }

    fn record<T>(&mut self, result: Result<TrackerReply<T>>) -> Result<TrackerReply<T>> {
        self.last_error = match &result {
            Ok(reply) => reply.status(),
            Err(e) => e.status_code(),
        };
        result
    }

    fn reject<T>(&mut self, code: StatusCode) -> TrackerReply<T> {
        self.last_error = code;
        TrackerReply::Status(code)
    }
}
