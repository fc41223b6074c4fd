//! Protocol codec
//!
//! Header packing, fixed-width field encodings and stream-based frame I/O.
//!
//! ## Header
//! ```text
//! byte  0         8       9        10
//!       ┌─────────┬───────┬────────┐
//!       │ len BE  │  cmd  │ status │
//!       └─────────┴───────┴────────┘
//! ```

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Charset, FramedResponse, StatusCode, TrackerCommand};
use crate::error::{Result, TrackerError};

/// Header size: 8 bytes body length + 1 byte command + 1 byte status
pub const HEADER_SIZE: usize = 10;

/// Width of a length/port integer on the wire
pub const PKG_LEN_SIZE: usize = 8;

/// Width of the group-name field
pub const GROUP_NAME_MAX_LEN: usize = 16;

/// Width of the IP-address field on the server side (15 usable bytes)
pub const IP_ADDR_SIZE: usize = 16;

/// Largest body accepted from a tracker (16 MB)
pub const MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub body_len: u64,
    pub command: u8,
    pub status: u8,
}

// =============================================================================
// Header Packing
// =============================================================================

/// Pack a frame header
pub fn pack_header(command: u8, body_len: u64, status: u8) -> [u8; HEADER_SIZE] {
    let mut header = [0u8; HEADER_SIZE];
    header[..PKG_LEN_SIZE].copy_from_slice(&body_len.to_be_bytes());
    header[PKG_LEN_SIZE] = command;
    header[PKG_LEN_SIZE + 1] = status;
    header
}

/// Parse a frame header from the first 10 bytes of `bytes`
pub fn parse_header(bytes: &[u8]) -> Result<FrameHeader> {
    if bytes.len() < HEADER_SIZE {
        return Err(TrackerError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut cursor = &bytes[..HEADER_SIZE];
    let body_len = cursor.get_u64();
    let command = cursor.get_u8();
    let status = cursor.get_u8();

    // The server treats the length as a signed 64-bit value
    if body_len > i64::MAX as u64 {
        return Err(TrackerError::Protocol(format!(
            "Negative body length in header: {}",
            body_len as i64
        )));
    }

    Ok(FrameHeader {
        body_len,
        command,
        status,
    })
}

// =============================================================================
// Fixed-width Fields
// =============================================================================

/// Encode a group name into its 16-byte field
///
/// Shorter names are NUL padded; longer names are cut to the first 16 bytes.
pub fn encode_group_name(charset: Charset, name: &str) -> [u8; GROUP_NAME_MAX_LEN] {
    let mut field = [0u8; GROUP_NAME_MAX_LEN];
    let bytes = charset.encode(name);
    let len = bytes.len().min(GROUP_NAME_MAX_LEN);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Encode a trailing IP address for a request body (at most 15 bytes, unpadded)
pub fn encode_ip_addr(charset: Charset, ip: &str) -> Vec<u8> {
    let mut bytes = charset.encode(ip);
    bytes.truncate(IP_ADDR_SIZE - 1);
    bytes
}

/// Decode a fixed-width text field, dropping NUL padding and surrounding
/// whitespace
pub fn decode_fixed_str(charset: Charset, field: &[u8]) -> String {
    let bytes: Vec<u8> = field.iter().copied().filter(|&b| b != 0).collect();
    charset.decode(&bytes).trim().to_string()
}

/// Read an 8-byte big-endian integer at `offset`
pub fn read_u64(body: &[u8], offset: usize) -> Result<u64> {
    let end = offset + PKG_LEN_SIZE;
    if body.len() < end {
        return Err(TrackerError::InvalidData(format!(
            "integer at offset {} overruns body of {} bytes",
            offset,
            body.len()
        )));
    }
    let mut cursor = &body[offset..end];
    Ok(cursor.get_u64())
}

// =============================================================================
// Stream-based I/O
// =============================================================================

/// Write one request frame. The body is given in parts that are sent back to
/// back; the header length covers all of them.
pub fn write_frame<W: Write>(writer: &mut W, command: TrackerCommand, body: &[&[u8]]) -> Result<()> {
    let body_len: usize = body.iter().map(|part| part.len()).sum();

    let mut frame = BytesMut::with_capacity(HEADER_SIZE + body_len);
    frame.put_slice(&pack_header(command.code(), body_len as u64, 0));
    for part in body {
        frame.put_slice(part);
    }

    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Read one response frame
///
/// A non-zero status is returned as a [`FramedResponse`] with an empty body;
/// only framing problems and I/O failures are errors. With
/// `expected_body_len = Some(n)` the body must be exactly `n` bytes.
pub fn read_frame<R: Read>(
    reader: &mut R,
    expected_command: TrackerCommand,
    expected_body_len: Option<usize>,
) -> Result<FramedResponse> {
    let mut header_bytes = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = parse_header(&header_bytes)?;

    if header.command != expected_command.code() {
        return Err(TrackerError::Protocol(format!(
            "Unexpected response command {}, expected {}",
            header.command,
            expected_command.code()
        )));
    }

    if header.body_len > MAX_BODY_SIZE {
        return Err(TrackerError::Protocol(format!(
            "Response body too large: {} bytes (max {})",
            header.body_len, MAX_BODY_SIZE
        )));
    }

    if header.status != 0 {
        // Drain whatever body came with the error so the stream stays framed
        if header.body_len > 0 {
            let drained = io::copy(&mut reader.by_ref().take(header.body_len), &mut io::sink())?;
            if drained < header.body_len {
                return Err(TrackerError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed inside an error response body",
                )));
            }
        }
        return Ok(FramedResponse::status(StatusCode(header.status)));
    }

    let body_len = header.body_len as usize;
    if let Some(expected) = expected_body_len {
        if body_len != expected {
            return Err(TrackerError::Protocol(format!(
                "Body length {} does not match expected {}",
                body_len, expected
            )));
        }
    }

    let mut body = vec![0u8; body_len];
    if body_len > 0 {
        reader.read_exact(&mut body)?;
    }

    Ok(FramedResponse::ok(Bytes::from(body)))
}
