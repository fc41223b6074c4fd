//! Resolution results handed to storage-transfer code.

use std::fmt;

use serde::Serialize;

use crate::protocol::StatusCode;

/// Separator between the group name and the file name in a file id
pub const FILE_ID_SEPARATOR: char = '/';

/// A storage server picked by a tracker for one upload, download or update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageServer {
    pub address: String,
    pub port: u16,
    /// Store path on the server the file goes to (0 for fetch/update)
    pub store_path_index: u8,
}

impl StorageServer {
    pub fn new(address: impl Into<String>, port: u16, store_path_index: u8) -> Self {
        Self {
            address: address.into(),
            port,
            store_path_index,
        }
    }
}

impl fmt::Display for StorageServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (store path {})",
            self.address, self.port, self.store_path_index
        )
    }
}

impl From<ServerInfo> for StorageServer {
    fn from(server: ServerInfo) -> Self {
        StorageServer::new(server.address, server.port, 0)
    }
}

/// Address of one replica able to serve a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub address: String,
    pub port: u16,
}

impl ServerInfo {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for ServerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// A file id (`group/remote_filename`) split into its two parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileId<'a> {
    pub group: &'a str,
    pub filename: &'a str,
}

impl<'a> FileId<'a> {
    /// Split on the first separator. Both halves must be non-empty; anything
    /// else is reported as EINVAL.
    pub fn parse(file_id: &'a str) -> Result<Self, StatusCode> {
        match file_id.split_once(FILE_ID_SEPARATOR) {
            Some((group, filename)) if !group.is_empty() && !filename.is_empty() => {
                Ok(Self { group, filename })
            }
            _ => Err(StatusCode::EINVAL),
        }
    }
}

impl fmt::Display for FileId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group, FILE_ID_SEPARATOR, self.filename)
    }
}
