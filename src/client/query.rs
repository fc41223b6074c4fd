//! Request building and response parsing for each tracker command.
//!
//! Every function here runs exactly one exchange over a connection it does
//! not own; connection lifetime is the caller's business.
//!
//! ## Response bodies
//! ```text
//! store one:  group(16) ip(15) port(8) store_path(1)                 = 40
//! store all:  group(16) [ip(15) port(8)] x n store_path(1)            = 17 + 23n
//! fetch:      group(16) ip(15) port(8) [ip(15)] x n                   = 39 + 15n
//! ```

use super::TrackerReply;
use crate::error::{Result, TrackerError};
use crate::network::TrackerConnection;
use crate::protocol::{
    decode_fixed_str, encode_group_name, encode_ip_addr, read_u64, Charset, StatusCode,
    TrackerCommand, GROUP_NAME_MAX_LEN, IP_ADDR_SIZE, PKG_LEN_SIZE,
};
use crate::stat::{decode_records, GroupStat, StatRecord, StorageStat};
use crate::types::{ServerInfo, StorageServer};

/// Body of a single store answer
pub const STORE_BODY_LEN: usize = GROUP_NAME_MAX_LEN + IP_ADDR_SIZE - 1 + PKG_LEN_SIZE + 1;

/// Fixed part of a fetch/update answer
pub const FETCH_BODY_LEN: usize = GROUP_NAME_MAX_LEN + IP_ADDR_SIZE - 1 + PKG_LEN_SIZE;

/// One address+port entry of a store-all answer
const STORE_RECORD_LEN: usize = IP_ADDR_SIZE - 1 + PKG_LEN_SIZE;

/// Most storage servers a store-all answer may list
pub const MAX_STORE_TARGETS: usize = 16;

// =============================================================================
// Store
// =============================================================================

fn store_command(group: Option<&str>, all: bool) -> TrackerCommand {
    let with_group = group.is_some_and(|g| !g.is_empty());
    match (with_group, all) {
        (false, false) => TrackerCommand::QueryStoreWithoutGroupOne,
        (true, false) => TrackerCommand::QueryStoreWithGroupOne,
        (false, true) => TrackerCommand::QueryStoreWithoutGroupAll,
        (true, true) => TrackerCommand::QueryStoreWithGroupAll,
    }
}

fn group_body(charset: Charset, group: Option<&str>) -> Vec<u8> {
    match group {
        Some(name) if !name.is_empty() => encode_group_name(charset, name).to_vec(),
        _ => Vec::new(),
    }
}

pub fn query_store_target(
    conn: &mut TrackerConnection,
    charset: Charset,
    group: Option<&str>,
) -> Result<TrackerReply<StorageServer>> {
    let command = store_command(group, false);
    let body = group_body(charset, group);

    let response = conn.request(command, &[body.as_slice()], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }

    let body = &response.body;
    if body.len() != STORE_BODY_LEN {
        return Err(TrackerError::InvalidData(format!(
            "Invalid body length: {}, expected {}",
            body.len(),
            STORE_BODY_LEN
        )));
    }
    let ip_end = GROUP_NAME_MAX_LEN + IP_ADDR_SIZE - 1;
    let address = decode_fixed_str(charset, &body[GROUP_NAME_MAX_LEN..ip_end]);
    let port = decode_port(body, ip_end)?;
    let store_path_index = body[STORE_BODY_LEN - 1];

    Ok(TrackerReply::Ok(StorageServer::new(address, port, store_path_index)))
}

pub fn query_store_targets(
    conn: &mut TrackerConnection,
    charset: Charset,
    group: Option<&str>,
) -> Result<TrackerReply<Vec<StorageServer>>> {
    let command = store_command(group, true);
    let body = group_body(charset, group);

    let response = conn.request(command, &[body.as_slice()], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }

    let body = &response.body;
    if body.len() < STORE_BODY_LEN {
        tracing::warn!("Store-all answer of {} bytes is too short", body.len());
        return Ok(TrackerReply::Status(StatusCode::EINVAL));
    }

    let records_len = body.len() - (GROUP_NAME_MAX_LEN + 1);
    if records_len % STORE_RECORD_LEN != 0 {
        tracing::warn!(
            "Store-all answer of {} bytes does not hold whole records",
            body.len()
        );
        return Ok(TrackerReply::Status(StatusCode::EINVAL));
    }

    let count = records_len / STORE_RECORD_LEN;
    if count > MAX_STORE_TARGETS {
        tracing::warn!(
            "Store-all answer lists {} servers (max {})",
            count,
            MAX_STORE_TARGETS
        );
        return Ok(TrackerReply::Status(StatusCode::ENOSPC));
    }

    let store_path_index = body[body.len() - 1];
    let mut servers = Vec::with_capacity(count);
    let mut offset = GROUP_NAME_MAX_LEN;
    for _ in 0..count {
        let address = decode_fixed_str(charset, &body[offset..offset + IP_ADDR_SIZE - 1]);
        offset += IP_ADDR_SIZE - 1;

        let port = match read_u64(body, offset).ok().and_then(|p| u16::try_from(p).ok()) {
            Some(port) => port,
            None => return Ok(TrackerReply::Status(StatusCode::EINVAL)),
        };
        offset += PKG_LEN_SIZE;

        servers.push(StorageServer::new(address, port, store_path_index));
    }

    Ok(TrackerReply::Ok(servers))
}

// =============================================================================
// Fetch / Update
// =============================================================================

/// Fetch-one, fetch-all and update share this exchange
///
/// The first entry is the authoritative source; the rest are alternate
/// addresses on the same port.
pub fn query_storages(
    conn: &mut TrackerConnection,
    charset: Charset,
    command: TrackerCommand,
    group: &str,
    filename: &str,
) -> Result<TrackerReply<Vec<ServerInfo>>> {
    let group_field = encode_group_name(charset, group);
    let filename = charset.encode(filename);

    let response = conn.request(command, &[&group_field[..], &filename[..]], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }

    let body = &response.body;
    if body.len() < FETCH_BODY_LEN {
        return Err(TrackerError::InvalidData(format!(
            "Invalid body length: {}",
            body.len()
        )));
    }
    if (body.len() - FETCH_BODY_LEN) % (IP_ADDR_SIZE - 1) != 0 {
        return Err(TrackerError::InvalidData(format!(
            "Invalid body length: {}",
            body.len()
        )));
    }

    let count = 1 + (body.len() - FETCH_BODY_LEN) / (IP_ADDR_SIZE - 1);
    let ip_end = GROUP_NAME_MAX_LEN + IP_ADDR_SIZE - 1;
    let address = decode_fixed_str(charset, &body[GROUP_NAME_MAX_LEN..ip_end]);
    let port = decode_port(body, ip_end)?;

    let mut servers = Vec::with_capacity(count);
    servers.push(ServerInfo::new(address, port));

    let mut offset = FETCH_BODY_LEN;
    for _ in 1..count {
        let alternate = decode_fixed_str(charset, &body[offset..offset + IP_ADDR_SIZE - 1]);
        servers.push(ServerInfo::new(alternate, port));
        offset += IP_ADDR_SIZE - 1;
    }

    Ok(TrackerReply::Ok(servers))
}

// =============================================================================
// Statistics
// =============================================================================

pub fn list_groups(
    conn: &mut TrackerConnection,
    charset: Charset,
) -> Result<TrackerReply<Vec<GroupStat>>> {
    let response = conn.request(TrackerCommand::ListAllGroups, &[], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }
    Ok(decode_stats(&response.body, charset))
}

pub fn list_one_group(
    conn: &mut TrackerConnection,
    charset: Charset,
    group: &str,
) -> Result<TrackerReply<GroupStat>> {
    let group_field = encode_group_name(charset, group);

    let response = conn.request(TrackerCommand::ListOneGroup, &[&group_field[..]], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }

    match decode_stats::<GroupStat>(&response.body, charset) {
        TrackerReply::Ok(mut stats) if stats.len() == 1 => Ok(TrackerReply::Ok(stats.remove(0))),
        TrackerReply::Ok(stats) => {
            tracing::warn!("List-one-group answer holds {} records", stats.len());
            Ok(TrackerReply::Status(StatusCode::EINVAL))
        }
        TrackerReply::Status(code) => Ok(TrackerReply::Status(code)),
    }
}

pub fn list_storages(
    conn: &mut TrackerConnection,
    charset: Charset,
    group: &str,
    storage_ip: Option<&str>,
) -> Result<TrackerReply<Vec<StorageStat>>> {
    let group_field = encode_group_name(charset, group);
    let ip = match storage_ip {
        Some(ip) if !ip.is_empty() => encode_ip_addr(charset, ip),
        _ => Vec::new(),
    };

    let response = conn.request(TrackerCommand::ListStorage, &[&group_field[..], &ip[..]], None)?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }
    Ok(decode_stats(&response.body, charset))
}

/// Decode failures are the tracker's fault, not the transport's: EINVAL
fn decode_stats<T: StatRecord>(body: &[u8], charset: Charset) -> TrackerReply<Vec<T>> {
    match decode_records::<T>(body, charset) {
        Ok(records) => TrackerReply::Ok(records),
        Err(e) => {
            tracing::warn!("Undecodable statistics answer: {}", e);
            TrackerReply::Status(StatusCode::EINVAL)
        }
    }
}

// =============================================================================
// Administration
// =============================================================================

/// Remove a storage server from one tracker
pub fn delete_storage(
    conn: &mut TrackerConnection,
    charset: Charset,
    group: &str,
    storage_ip: &str,
) -> Result<TrackerReply<()>> {
    let group_field = encode_group_name(charset, group);
    let ip = encode_ip_addr(charset, storage_ip);

    let response = conn.request(TrackerCommand::DeleteStorage, &[&group_field[..], &ip[..]], Some(0))?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }
    Ok(TrackerReply::Ok(()))
}

pub fn active_test(conn: &mut TrackerConnection) -> Result<TrackerReply<()>> {
    let response = conn.request(TrackerCommand::ActiveTest, &[], Some(0))?;
    if !response.is_ok() {
        return Ok(TrackerReply::Status(response.status));
    }
    Ok(TrackerReply::Ok(()))
}

fn decode_port(body: &[u8], offset: usize) -> Result<u16> {
    let port = read_u64(body, offset)?;
    u16::try_from(port)
        .map_err(|_| TrackerError::InvalidData(format!("port {} out of range", port)))
}
