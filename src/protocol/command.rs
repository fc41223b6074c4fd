//! Command, status and storage-state codes
//!
//! These values are fixed by the tracker server implementation.

use std::fmt;

use serde::Serialize;

/// Tracker command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrackerCommand {
    Quit = 82,
    ListOneGroup = 90,
    ListAllGroups = 91,
    ListStorage = 92,
    DeleteStorage = 93,
    Response = 100,
    QueryStoreWithoutGroupOne = 101,
    QueryFetchOne = 102,
    QueryUpdate = 103,
    QueryStoreWithGroupOne = 104,
    QueryFetchAll = 105,
    QueryStoreWithoutGroupAll = 106,
    QueryStoreWithGroupAll = 107,
    ActiveTest = 111,
}

impl TrackerCommand {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Status byte of a response frame
///
/// `0` is success; anything else is an errno-style code assigned by the
/// tracker (or by the client for failures it detects itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StatusCode(pub u8);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0);
    pub const ENOENT: StatusCode = StatusCode(2);
    pub const EIO: StatusCode = StatusCode(5);
    pub const EBUSY: StatusCode = StatusCode(16);
    pub const EINVAL: StatusCode = StatusCode(22);
    pub const ENOSPC: StatusCode = StatusCode(28);
    pub const ECONNREFUSED: StatusCode = StatusCode(61);
    pub const EALREADY: StatusCode = StatusCode(114);

    pub fn is_ok(self) -> bool {
        self.0 == 0
    }

    /// Symbolic name for the codes the client knows about
    pub fn name(self) -> Option<&'static str> {
        match self {
            StatusCode::OK => Some("OK"),
            StatusCode::ENOENT => Some("ENOENT"),
            StatusCode::EIO => Some("EIO"),
            StatusCode::EBUSY => Some("EBUSY"),
            StatusCode::EINVAL => Some("EINVAL"),
            StatusCode::ENOSPC => Some("ENOSPC"),
            StatusCode::ECONNREFUSED => Some("ECONNREFUSED"),
            StatusCode::EALREADY => Some("EALREADY"),
            _ => None,
        }
    }
}

impl From<u8> for StatusCode {
    fn from(code: u8) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// State of a storage server as seen by one tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageStatus {
    Init,
    WaitSync,
    Syncing,
    IpChanged,
    Deleted,
    Offline,
    Online,
    Active,
    Recovery,
    None,
    Unknown(u8),
}

impl StorageStatus {
    pub fn code(self) -> u8 {
        match self {
            StorageStatus::Init => 0,
            StorageStatus::WaitSync => 1,
            StorageStatus::Syncing => 2,
            StorageStatus::IpChanged => 3,
            StorageStatus::Deleted => 4,
            StorageStatus::Offline => 5,
            StorageStatus::Online => 6,
            StorageStatus::Active => 7,
            StorageStatus::Recovery => 9,
            StorageStatus::None => 99,
            StorageStatus::Unknown(code) => code,
        }
    }

    /// Online or actively serving; such a server must not be deleted.
    pub fn is_live(self) -> bool {
        matches!(self, StorageStatus::Online | StorageStatus::Active)
    }
}

impl From<u8> for StorageStatus {
    fn from(code: u8) -> Self {
        match code {
            0 => StorageStatus::Init,
            1 => StorageStatus::WaitSync,
            2 => StorageStatus::Syncing,
            3 => StorageStatus::IpChanged,
            4 => StorageStatus::Deleted,
            5 => StorageStatus::Offline,
            6 => StorageStatus::Online,
            7 => StorageStatus::Active,
            9 => StorageStatus::Recovery,
            99 => StorageStatus::None,
            other => StorageStatus::Unknown(other),
        }
    }
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageStatus::Init => "INIT",
            StorageStatus::WaitSync => "WAIT_SYNC",
            StorageStatus::Syncing => "SYNCING",
            StorageStatus::IpChanged => "IP_CHANGED",
            StorageStatus::Deleted => "DELETED",
            StorageStatus::Offline => "OFFLINE",
            StorageStatus::Online => "ONLINE",
            StorageStatus::Active => "ACTIVE",
            StorageStatus::Recovery => "RECOVERY",
            StorageStatus::None => "NONE",
            StorageStatus::Unknown(code) => return write!(f, "UNKNOWN({})", code),
        };
        f.write_str(name)
    }
}
