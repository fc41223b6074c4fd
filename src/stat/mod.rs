//! Statistics Module
//!
//! Fixed-layout records returned by the list-group and list-storage
//! commands. Each record type declares a field table (name, offset, width,
//! kind); [`decode_records`] slices a response body into records of that
//! width and hands each one to the type through a [`RecordView`].
//!
//! ```text
//! body: ┌──────────── record 0 ────────────┬──────────── record 1 ────────────┐
//!       │ field 0 │ field 1 │ ... │ field n │ field 0 │ field 1 │ ... │ field n │
//!       └─────────┴─────────┴─────┴─────────┴─────────┴─────────┴─────┴─────────┘
//! ```

mod group;
mod storage;

pub use group::GroupStat;
pub use storage::{StorageCounters, StorageStat};

use bytes::Buf;
use chrono::{DateTime, Utc};

use crate::error::{Result, TrackerError};
use crate::protocol::Charset;

/// How a field's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// NUL padded text
    Text,
    /// Big-endian unsigned integer (8 bytes)
    Int,
    /// Single byte
    Byte,
    /// Single byte, non-zero is true
    Bool,
    /// Unix seconds, big-endian (8 bytes)
    Timestamp,
}

/// One entry of a record's field table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub kind: FieldKind,
}

/// Lay fields out back to back, computing each offset from the widths of
/// the fields before it
pub const fn layout<const N: usize>(fields: [(&'static str, FieldKind, usize); N]) -> [FieldSpec; N] {
    let mut specs = [FieldSpec {
        name: "",
        offset: 0,
        width: 0,
        kind: FieldKind::Byte,
    }; N];

    let mut offset = 0;
    let mut i = 0;
    while i < N {
        let (name, kind, width) = fields[i];
        specs[i] = FieldSpec {
            name,
            offset,
            width,
            kind,
        };
        offset += width;
        i += 1;
    }
    specs
}

/// Total width of a record described by `fields`
pub const fn record_size(fields: &[FieldSpec]) -> usize {
    let mut size = 0;
    let mut i = 0;
    while i < fields.len() {
        let end = fields[i].offset + fields[i].width;
        if end > size {
            size = end;
        }
        i += 1;
    }
    size
}

/// A record type with a fixed wire layout
pub trait StatRecord: Sized {
    /// Field table, in wire order
    const FIELDS: &'static [FieldSpec];

    /// Build the record from one record-sized slice
    fn from_record(record: &RecordView<'_>) -> Result<Self>;

    /// Width of one record on the wire
    fn record_size() -> usize {
        record_size(Self::FIELDS)
    }
}

/// Decode a body holding zero or more records of type `T`
///
/// The body length must be an exact multiple of the record width.
pub fn decode_records<T: StatRecord>(body: &[u8], charset: Charset) -> Result<Vec<T>> {
    let size = T::record_size();
    if size == 0 || body.len() % size != 0 {
        return Err(TrackerError::InvalidData(format!(
            "body length {} is not a multiple of record size {}",
            body.len(),
            size
        )));
    }

    body.chunks_exact(size)
        .map(|chunk| {
            T::from_record(&RecordView {
                bytes: chunk,
                fields: T::FIELDS,
                charset,
            })
        })
        .collect()
}

/// Typed, name-based access to the fields of one record
pub struct RecordView<'a> {
    bytes: &'a [u8],
    fields: &'static [FieldSpec],
    charset: Charset,
}

impl<'a> RecordView<'a> {
    fn field(&self, name: &str, kind: FieldKind) -> Result<&'a [u8]> {
        let spec = self
            .fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| TrackerError::InvalidData(format!("unknown field '{}'", name)))?;

        if spec.kind != kind {
            return Err(TrackerError::InvalidData(format!(
                "field '{}' is {:?}, read as {:?}",
                name, spec.kind, kind
            )));
        }

        self.bytes
            .get(spec.offset..spec.offset + spec.width)
            .ok_or_else(|| TrackerError::InvalidData(format!("field '{}' overruns record", name)))
    }

    pub fn text(&self, name: &str) -> Result<String> {
        let field = self.field(name, FieldKind::Text)?;
        Ok(crate::protocol::decode_fixed_str(self.charset, field))
    }

    pub fn int(&self, name: &str) -> Result<u64> {
        let mut field = self.field(name, FieldKind::Int)?;
        if field.len() != 8 {
            return Err(TrackerError::InvalidData(format!(
                "integer field '{}' is {} bytes wide",
                name,
                field.len()
            )));
        }
        Ok(field.get_u64())
    }

    pub fn byte(&self, name: &str) -> Result<u8> {
        let field = self.field(name, FieldKind::Byte)?;
        field
            .first()
            .copied()
            .ok_or_else(|| TrackerError::InvalidData(format!("byte field '{}' is empty", name)))
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        let field = self.field(name, FieldKind::Bool)?;
        Ok(field.first().is_some_and(|&b| b != 0))
    }

    /// Zero means "never"
    pub fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let mut field = self.field(name, FieldKind::Timestamp)?;
        if field.len() != 8 {
            return Err(TrackerError::InvalidData(format!(
                "timestamp field '{}' is {} bytes wide",
                name,
                field.len()
            )));
        }
        let secs = field.get_i64();
        if secs == 0 {
            return Ok(None);
        }
        DateTime::from_timestamp(secs, 0)
            .map(Some)
            .ok_or_else(|| TrackerError::InvalidData(format!("timestamp {} out of range", secs)))
    }
}
