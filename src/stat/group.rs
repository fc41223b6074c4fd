//! Group statistics record (105 bytes).

use serde::Serialize;

use super::{layout, FieldKind, FieldSpec, RecordView, StatRecord};
use crate::error::Result;
use crate::protocol::GROUP_NAME_MAX_LEN;

const GROUP_FIELDS: [FieldSpec; 12] = layout([
    ("group_name", FieldKind::Text, GROUP_NAME_MAX_LEN + 1),
    ("total_mb", FieldKind::Int, 8),
    ("free_mb", FieldKind::Int, 8),
    ("trunk_free_mb", FieldKind::Int, 8),
    ("storage_count", FieldKind::Int, 8),
    ("storage_port", FieldKind::Int, 8),
    ("storage_http_port", FieldKind::Int, 8),
    ("active_count", FieldKind::Int, 8),
    ("current_write_server", FieldKind::Int, 8),
    ("store_path_count", FieldKind::Int, 8),
    ("subdir_count_per_path", FieldKind::Int, 8),
    ("current_trunk_file_id", FieldKind::Int, 8),
]);

/// One group as reported by a tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStat {
    pub group_name: String,
    pub total_mb: u64,
    pub free_mb: u64,
    pub trunk_free_mb: u64,
    pub storage_count: u64,
    pub storage_port: u64,
    pub storage_http_port: u64,
    pub active_count: u64,
    pub current_write_server: u64,
    pub store_path_count: u64,
    pub subdir_count_per_path: u64,
    pub current_trunk_file_id: u64,
}

impl StatRecord for GroupStat {
    const FIELDS: &'static [FieldSpec] = &GROUP_FIELDS;

    fn from_record(record: &RecordView<'_>) -> Result<Self> {
        Ok(Self {
            group_name: record.text("group_name")?,
            total_mb: record.int("total_mb")?,
            free_mb: record.int("free_mb")?,
            trunk_free_mb: record.int("trunk_free_mb")?,
            storage_count: record.int("storage_count")?,
            storage_port: record.int("storage_port")?,
            storage_http_port: record.int("storage_http_port")?,
            active_count: record.int("active_count")?,
            current_write_server: record.int("current_write_server")?,
            store_path_count: record.int("store_path_count")?,
            subdir_count_per_path: record.int("subdir_count_per_path")?,
            current_trunk_file_id: record.int("current_trunk_file_id")?,
        })
    }
}
