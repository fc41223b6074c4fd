//! Protocol Module
//!
//! Wire format of the FastDFS tracker protocol.
//!
//! ## Frame Format
//! ```text
//! ┌──────────────────┬──────────┬────────────┬─────────────────────┐
//! │ Body Len (8, BE) │  Cmd (1) │ Status (1) │        Body         │
//! └──────────────────┴──────────┴────────────┴─────────────────────┘
//! ```
//!
//! Requests always carry status 0. Responses carry command 100 (RESP) and the
//! tracker's status code; a non-zero status means the body is unusable.
//!
//! ### Fixed-width fields
//! - Group name: 16 bytes, NUL padded, silently truncated
//! - IP address: 16 bytes on the server side, 15 usable
//! - Ports and lengths: 8 bytes, big-endian

mod charset;
mod codec;
mod command;
mod response;

pub use charset::Charset;
pub use codec::{
    decode_fixed_str, encode_group_name, encode_ip_addr, pack_header, parse_header,
    read_frame, read_u64, write_frame, FrameHeader, GROUP_NAME_MAX_LEN, HEADER_SIZE,
    IP_ADDR_SIZE, MAX_BODY_SIZE, PKG_LEN_SIZE,
};
pub use command::{StatusCode, StorageStatus, TrackerCommand};
pub use response::FramedResponse;
