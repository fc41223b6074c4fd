//! Storage server statistics record (600 bytes).

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{layout, FieldKind, FieldSpec, RecordView, StatRecord};
use crate::error::Result;
use crate::protocol::{StorageStatus, IP_ADDR_SIZE};

const STORAGE_ID_MAX_SIZE: usize = 16;
const DOMAIN_NAME_MAX_SIZE: usize = 128;
const VERSION_SIZE: usize = 6;

const STORAGE_FIELDS: [FieldSpec; 59] = layout([
    ("status", FieldKind::Byte, 1),
    ("id", FieldKind::Text, STORAGE_ID_MAX_SIZE),
    ("ip_addr", FieldKind::Text, IP_ADDR_SIZE),
    ("domain_name", FieldKind::Text, DOMAIN_NAME_MAX_SIZE),
    ("src_ip_addr", FieldKind::Text, IP_ADDR_SIZE),
    ("version", FieldKind::Text, VERSION_SIZE),
    ("join_time", FieldKind::Timestamp, 8),
    ("up_time", FieldKind::Timestamp, 8),
    // capacity and configuration
    ("total_mb", FieldKind::Int, 8),
    ("free_mb", FieldKind::Int, 8),
    ("upload_priority", FieldKind::Int, 8),
    ("store_path_count", FieldKind::Int, 8),
    ("subdir_count_per_path", FieldKind::Int, 8),
    ("current_write_path", FieldKind::Int, 8),
    ("storage_port", FieldKind::Int, 8),
    ("storage_http_port", FieldKind::Int, 8),
    // operation counters
    ("total_upload_count", FieldKind::Int, 8),
    ("success_upload_count", FieldKind::Int, 8),
    ("total_append_count", FieldKind::Int, 8),
    ("success_append_count", FieldKind::Int, 8),
    ("total_modify_count", FieldKind::Int, 8),
    ("success_modify_count", FieldKind::Int, 8),
    ("total_truncate_count", FieldKind::Int, 8),
    ("success_truncate_count", FieldKind::Int, 8),
    ("total_set_meta_count", FieldKind::Int, 8),
    ("success_set_meta_count", FieldKind::Int, 8),
    ("total_delete_count", FieldKind::Int, 8),
    ("success_delete_count", FieldKind::Int, 8),
    ("total_download_count", FieldKind::Int, 8),
    ("success_download_count", FieldKind::Int, 8),
    ("total_get_meta_count", FieldKind::Int, 8),
    ("success_get_meta_count", FieldKind::Int, 8),
    ("total_create_link_count", FieldKind::Int, 8),
    ("success_create_link_count", FieldKind::Int, 8),
    ("total_delete_link_count", FieldKind::Int, 8),
    ("success_delete_link_count", FieldKind::Int, 8),
    // byte counters
    ("total_upload_bytes", FieldKind::Int, 8),
    ("success_upload_bytes", FieldKind::Int, 8),
    ("total_append_bytes", FieldKind::Int, 8),
    ("success_append_bytes", FieldKind::Int, 8),
    ("total_modify_bytes", FieldKind::Int, 8),
    ("success_modify_bytes", FieldKind::Int, 8),
    ("total_download_bytes", FieldKind::Int, 8),
    ("success_download_bytes", FieldKind::Int, 8),
    ("total_sync_in_bytes", FieldKind::Int, 8),
    ("success_sync_in_bytes", FieldKind::Int, 8),
    ("total_sync_out_bytes", FieldKind::Int, 8),
    ("success_sync_out_bytes", FieldKind::Int, 8),
    // file io counters
    ("total_file_open_count", FieldKind::Int, 8),
    ("success_file_open_count", FieldKind::Int, 8),
    ("total_file_read_count", FieldKind::Int, 8),
    ("success_file_read_count", FieldKind::Int, 8),
    ("total_file_write_count", FieldKind::Int, 8),
    ("success_file_write_count", FieldKind::Int, 8),
    // sync bookkeeping
    ("last_source_update", FieldKind::Timestamp, 8),
    ("last_sync_update", FieldKind::Timestamp, 8),
    ("last_synced_timestamp", FieldKind::Timestamp, 8),
    ("last_heart_beat_time", FieldKind::Timestamp, 8),
    ("if_trunk_server", FieldKind::Bool, 1),
]);

/// Operation counters of one storage server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageCounters {
    pub total_upload_count: u64,
    pub success_upload_count: u64,
    pub total_append_count: u64,
    pub success_append_count: u64,
    pub total_modify_count: u64,
    pub success_modify_count: u64,
    pub total_truncate_count: u64,
    pub success_truncate_count: u64,
    pub total_set_meta_count: u64,
    pub success_set_meta_count: u64,
    pub total_delete_count: u64,
    pub success_delete_count: u64,
    pub total_download_count: u64,
    pub success_download_count: u64,
    pub total_get_meta_count: u64,
    pub success_get_meta_count: u64,
    pub total_create_link_count: u64,
    pub success_create_link_count: u64,
    pub total_delete_link_count: u64,
    pub success_delete_link_count: u64,
    pub total_upload_bytes: u64,
    pub success_upload_bytes: u64,
    pub total_append_bytes: u64,
    pub success_append_bytes: u64,
    pub total_modify_bytes: u64,
    pub success_modify_bytes: u64,
    pub total_download_bytes: u64,
    pub success_download_bytes: u64,
    pub total_sync_in_bytes: u64,
    pub success_sync_in_bytes: u64,
    pub total_sync_out_bytes: u64,
    pub success_sync_out_bytes: u64,
    pub total_file_open_count: u64,
    pub success_file_open_count: u64,
    pub total_file_read_count: u64,
    pub success_file_read_count: u64,
    pub total_file_write_count: u64,
    pub success_file_write_count: u64,
}

/// One storage server as reported by a tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageStat {
    pub status: StorageStatus,
    pub id: String,
    pub ip_addr: String,
    pub domain_name: String,
    pub src_ip_addr: String,
    pub version: String,
    pub join_time: Option<DateTime<Utc>>,
    pub up_time: Option<DateTime<Utc>>,
    pub total_mb: u64,
    pub free_mb: u64,
    pub upload_priority: u64,
    pub store_path_count: u64,
    pub subdir_count_per_path: u64,
    pub current_write_path: u64,
    pub storage_port: u64,
    pub storage_http_port: u64,
    pub counters: StorageCounters,
    pub last_source_update: Option<DateTime<Utc>>,
    pub last_sync_update: Option<DateTime<Utc>>,
    pub last_synced_timestamp: Option<DateTime<Utc>>,
    pub last_heart_beat_time: Option<DateTime<Utc>>,
    pub if_trunk_server: bool,
}

impl StatRecord for StorageStat {
    const FIELDS: &'static [FieldSpec] = &STORAGE_FIELDS;

    fn from_record(record: &RecordView<'_>) -> Result<Self> {
        let counters = StorageCounters {
            total_upload_count: record.int("total_upload_count")?,
            success_upload_count: record.int("success_upload_count")?,
            total_append_count: record.int("total_append_count")?,
            success_append_count: record.int("success_append_count")?,
            total_modify_count: record.int("total_modify_count")?,
            success_modify_count: record.int("success_modify_count")?,
            total_truncate_count: record.int("total_truncate_count")?,
            success_truncate_count: record.int("success_truncate_count")?,
            total_set_meta_count: record.int("total_set_meta_count")?,
            success_set_meta_count: record.int("success_set_meta_count")?,
            total_delete_count: record.int("total_delete_count")?,
            success_delete_count: record.int("success_delete_count")?,
            total_download_count: record.int("total_download_count")?,
            success_download_count: record.int("success_download_count")?,
            total_get_meta_count: record.int("total_get_meta_count")?,
            success_get_meta_count: record.int("success_get_meta_count")?,
            total_create_link_count: record.int("total_create_link_count")?,
            success_create_link_count: record.int("success_create_link_count")?,
            total_delete_link_count: record.int("total_delete_link_count")?,
            success_delete_link_count: record.int("success_delete_link_count")?,
            total_upload_bytes: record.int("total_upload_bytes")?,
            success_upload_bytes: record.int("success_upload_bytes")?,
            total_append_bytes: record.int("total_append_bytes")?,
            success_append_bytes: record.int("success_append_bytes")?,
            total_modify_bytes: record.int("total_modify_bytes")?,
            success_modify_bytes: record.int("success_modify_bytes")?,
            total_download_bytes: record.int("total_download_bytes")?,
            success_download_bytes: record.int("success_download_bytes")?,
            total_sync_in_bytes: record.int("total_sync_in_bytes")?,
            success_sync_in_bytes: record.int("success_sync_in_bytes")?,
            total_sync_out_bytes: record.int("total_sync_out_bytes")?,
            success_sync_out_bytes: record.int("success_sync_out_bytes")?,
            total_file_open_count: record.int("total_file_open_count")?,
            success_file_open_count: record.int("success_file_open_count")?,
            total_file_read_count: record.int("total_file_read_count")?,
            success_file_read_count: record.int("success_file_read_count")?,
            total_file_write_count: record.int("total_file_write_count")?,
            success_file_write_count: record.int("success_file_write_count")?,
        };

        Ok(Self {
            status: StorageStatus::from(record.byte("status")?),
            id: record.text("id")?,
            ip_addr: record.text("ip_addr")?,
            domain_name: record.text("domain_name")?,
            src_ip_addr: record.text("src_ip_addr")?,
            version: record.text("version")?,
            join_time: record.timestamp("join_time")?,
            up_time: record.timestamp("up_time")?,
            total_mb: record.int("total_mb")?,
            free_mb: record.int("free_mb")?,
            upload_priority: record.int("upload_priority")?,
            store_path_count: record.int("store_path_count")?,
            subdir_count_per_path: record.int("subdir_count_per_path")?,
            current_write_path: record.int("current_write_path")?,
            storage_port: record.int("storage_port")?,
            storage_http_port: record.int("storage_http_port")?,
            counters,
            last_source_update: record.timestamp("last_source_update")?,
            last_sync_update: record.timestamp("last_sync_update")?,
            last_synced_timestamp: record.timestamp("last_synced_timestamp")?,
            last_heart_beat_time: record.timestamp("last_heart_beat_time")?,
            if_trunk_server: record.boolean("if_trunk_server")?,
        })
    }
}
