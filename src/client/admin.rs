//! Cluster statistics and storage-server removal.

use super::{query, TrackerClient, TrackerReply};
use crate::error::Result;
use crate::network::TrackerConnection;
use crate::protocol::StatusCode;
use crate::stat::{GroupStat, StorageStat};

impl TrackerClient {
    // =========================================================================
    // Statistics
    // =========================================================================

    /// Statistics of every group known to the tracker
    pub fn list_groups(
        &mut self,
        conn: Option<&mut TrackerConnection>,
    ) -> Result<TrackerReply<Vec<GroupStat>>> {
        self.run(conn, query::list_groups)
    }

    /// Statistics of a single group
    pub fn list_group(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: &str,
    ) -> Result<TrackerReply<GroupStat>> {
        self.run(conn, |conn, charset| query::list_one_group(conn, charset, group))
    }

    /// Storage servers of `group`, or only the one at `storage_ip`
    pub fn list_storages(
        &mut self,
        conn: Option<&mut TrackerConnection>,
        group: &str,
        storage_ip: Option<&str>,
    ) -> Result<TrackerReply<Vec<StorageStat>>> {
        self.run(conn, |conn, charset| {
            query::list_storages(conn, charset, group, storage_ip)
        })
    }

    /// Check that a tracker is alive
    pub fn active_test(&mut self, conn: Option<&mut TrackerConnection>) -> Result<TrackerReply<()>> {
        self.run(conn, |conn, _| query::active_test(conn))
    }

    // =========================================================================
    // Storage Removal
    // =========================================================================

    /// Remove a storage server from every tracker of the group
    ///
    /// Runs in two rounds over all trackers:
    ///
    /// 1. Each tracker is asked for its view of the server. Any tracker that
    ///    still sees it ONLINE or ACTIVE ends the call with EBUSY; if no
    ///    tracker knows it the call ends with ENOENT. Nothing is deleted in
    ///    either case.
    /// 2. Each tracker is told to drop it. ENOENT and EALREADY from a single
    ///    tracker are tolerated, any other status ends the call with that
    ///    status. ENOENT from all of them ends the call with ENOENT.
    ///
    /// A tracker that cannot be reached ends the call with ECONNREFUSED.
    pub fn delete_storage(&mut self, group: &str, storage_ip: &str) -> Result<TrackerReply<()>> {
        let result = self.delete_storage_rounds(group, storage_ip);
        self.record(result)
    }

    fn delete_storage_rounds(&self, group: &str, storage_ip: &str) -> Result<TrackerReply<()>> {
        let charset = self.group.charset();
        let tracker_count = self.group.len();

        // Round 1: nobody may still consider the server live
        let mut not_found = 0;
        for index in 0..tracker_count {
            let Some(mut conn) = self.connect_for_removal(index) else {
                return Ok(TrackerReply::Status(StatusCode::ECONNREFUSED));
            };

            let reply = query::list_storages(&mut conn, charset, group, Some(storage_ip));
            conn.close();

            match reply? {
                TrackerReply::Status(StatusCode::ENOENT) => not_found += 1,
                TrackerReply::Status(code) => {
                    tracing::warn!(
                        "Tracker {} refused storage lookup for {}/{}: {}",
                        conn.endpoint(),
                        group,
                        storage_ip,
                        code
                    );
                    return Ok(TrackerReply::Status(code));
                }
                TrackerReply::Ok(stats) => match stats.first() {
                    None => not_found += 1,
                    Some(stat) if stat.status.is_live() => {
                        tracing::warn!(
                            "Storage {}/{} is {} on tracker {}, not deleting",
                            group,
                            storage_ip,
                            stat.status,
                            conn.endpoint()
                        );
                        return Ok(TrackerReply::Status(StatusCode::EBUSY));
                    }
                    Some(_) => {}
                },
            }
        }

        if not_found == tracker_count {
            tracing::debug!("No tracker knows storage {}/{}", group, storage_ip);
            return Ok(TrackerReply::Status(StatusCode::ENOENT));
        }

        // Round 2: delete everywhere
        let mut not_found = 0;
        for index in 0..tracker_count {
            let Some(mut conn) = self.connect_for_removal(index) else {
                return Ok(TrackerReply::Status(StatusCode::ECONNREFUSED));
            };

            let reply = query::delete_storage(&mut conn, charset, group, storage_ip);
            conn.close();

            match reply? {
                TrackerReply::Ok(()) => {
                    tracing::info!(
                        "Tracker {} deleted storage {}/{}",
                        conn.endpoint(),
                        group,
                        storage_ip
                    );
                }
                TrackerReply::Status(StatusCode::ENOENT) => not_found += 1,
                TrackerReply::Status(StatusCode::EALREADY) => {}
                TrackerReply::Status(code) => {
                    tracing::warn!(
                        "Tracker {} failed to delete storage {}/{}: {}",
                        conn.endpoint(),
                        group,
                        storage_ip,
                        code
                    );
                    return Ok(TrackerReply::Status(code));
                }
            }
        }

        if not_found == tracker_count {
            return Ok(TrackerReply::Status(StatusCode::ENOENT));
        }
        Ok(TrackerReply::Ok(()))
    }

    fn connect_for_removal(&self, index: usize) -> Option<TrackerConnection> {
        match self.group.connect(index) {
            Ok(conn) => Some(conn),
            Err(e) => {
                tracing::warn!("Storage removal aborted: {}", e);
                None
            }
        }
    }
}
