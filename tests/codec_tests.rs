//! Codec Tests
//!
//! Header packing, fixed-width fields and frame reading.

use std::io::Cursor;

use fdfs_tracker::protocol::{
    decode_fixed_str, encode_group_name, encode_ip_addr, pack_header, parse_header, read_frame,
    read_u64, write_frame, Charset, StatusCode, TrackerCommand, HEADER_SIZE,
};
use fdfs_tracker::TrackerError;

fn response_frame(body: &[u8], status: u8) -> Vec<u8> {
    let mut frame = pack_header(TrackerCommand::Response.code(), body.len() as u64, status).to_vec();
    frame.extend_from_slice(body);
    frame
}

// =============================================================================
// Header Tests
// =============================================================================

#[test]
fn test_pack_header_layout() {
    let header = pack_header(TrackerCommand::QueryFetchOne.code(), 0x0102, 0);

    assert_eq!(header.len(), HEADER_SIZE);
    assert_eq!(&header[..8], &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
    assert_eq!(header[8], 102);
    assert_eq!(header[9], 0);
}

#[test]
fn test_parse_header_fields() {
    let header = pack_header(100, 39, 2);
    let parsed = parse_header(&header).unwrap();

    assert_eq!(parsed.body_len, 39);
    assert_eq!(parsed.command, 100);
    assert_eq!(parsed.status, 2);
}

#[test]
fn test_header_boundary_values() {
    let triples = [
        (0u8, 0u64, 0u8),
        (111, 600 * 1024, 28),
        (255, i64::MAX as u64, 255),
    ];

    for (command, body_len, status) in triples {
        let parsed = parse_header(&pack_header(command, body_len, status)).unwrap();
        assert_eq!(parsed.command, command);
        assert_eq!(parsed.body_len, body_len);
        assert_eq!(parsed.status, status);
    }
}

#[test]
fn test_parse_header_too_short() {
    let result = parse_header(&[0u8; 9]);
    assert!(matches!(result, Err(TrackerError::Protocol(_))));
}

#[test]
fn test_parse_header_negative_length() {
    let mut header = pack_header(100, 0, 0);
    header[0] = 0x80;
    assert!(matches!(parse_header(&header), Err(TrackerError::Protocol(_))));
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_group_name_padded() {
    let field = encode_group_name(Charset::Latin1, "group1");

    assert_eq!(&field[..6], b"group1");
    assert!(field[6..].iter().all(|&b| b == 0));
}

#[test]
fn test_group_name_truncated() {
    let field = encode_group_name(Charset::Latin1, "a_very_long_group_name");
    assert_eq!(&field, b"a_very_long_grou");
}

#[test]
fn test_group_name_decodes_back() {
    for charset in [Charset::Latin1, Charset::Utf8] {
        for name in ["", "group1", "exactly16bytes!!"] {
            let field = encode_group_name(charset, name);
            assert_eq!(decode_fixed_str(charset, &field), name);
        }

        let field = encode_group_name(charset, "group_name_longer_than_16");
        assert_eq!(decode_fixed_str(charset, &field), "group_name_longe");
    }
}

#[test]
fn test_ip_addr_capped_at_15_bytes() {
    assert_eq!(encode_ip_addr(Charset::Latin1, "10.0.0.5"), b"10.0.0.5");
    assert_eq!(encode_ip_addr(Charset::Latin1, "1234567890abcdefgh").len(), 15);
}

#[test]
fn test_decode_fixed_str_strips_padding() {
    let mut field = b"10.0.0.5".to_vec();
    field.resize(15, 0);
    assert_eq!(decode_fixed_str(Charset::Latin1, &field), "10.0.0.5");
    assert_eq!(decode_fixed_str(Charset::Latin1, &[0u8; 15]), "");
}

#[test]
fn test_latin1_replaces_wide_chars() {
    assert_eq!(Charset::Latin1.encode("café"), vec![b'c', b'a', b'f', 0xE9]);
    assert_eq!(Charset::Latin1.encode("文件"), b"??");
    assert_eq!(Charset::Latin1.decode(&[b'c', 0xE9]), "cé");
    assert_eq!(Charset::Utf8.encode("é"), vec![0xC3, 0xA9]);
}

#[test]
fn test_charset_names() {
    assert_eq!("ISO8859-1".parse::<Charset>().unwrap(), Charset::Latin1);
    assert_eq!("utf-8".parse::<Charset>().unwrap(), Charset::Utf8);
    assert!("EBCDIC".parse::<Charset>().is_err());
}

#[test]
fn test_read_u64_overrun() {
    let body = 23000u64.to_be_bytes();
    assert_eq!(read_u64(&body, 0).unwrap(), 23000);
    assert!(matches!(read_u64(&body, 1), Err(TrackerError::InvalidData(_))));
}

// =============================================================================
// Frame I/O Tests
// =============================================================================

#[test]
fn test_write_frame_concatenates_parts() {
    let mut out = Vec::new();
    write_frame(&mut out, TrackerCommand::ListStorage, &[&b"group1"[..], &b"10.0.0.5"[..]]).unwrap();

    let header = parse_header(&out).unwrap();
    assert_eq!(header.body_len, 14);
    assert_eq!(header.command, 92);
    assert_eq!(header.status, 0);
    assert_eq!(&out[HEADER_SIZE..], b"group110.0.0.5");
}

#[test]
fn test_read_frame_ok() {
    let frame = response_frame(b"hello", 0);
    let response = read_frame(&mut Cursor::new(frame), TrackerCommand::Response, None).unwrap();

    assert!(response.is_ok());
    assert_eq!(&response.body[..], b"hello");
}

#[test]
fn test_read_frame_status_drains_body() {
    let mut stream = response_frame(b"junk", 2);
    stream.extend(response_frame(b"next", 0));
    let mut cursor = Cursor::new(stream);

    let first = read_frame(&mut cursor, TrackerCommand::Response, Some(40)).unwrap();
    assert_eq!(first.status, StatusCode::ENOENT);
    assert!(first.body.is_empty());

    let second = read_frame(&mut cursor, TrackerCommand::Response, None).unwrap();
    assert_eq!(&second.body[..], b"next");
}

#[test]
fn test_read_frame_length_mismatch() {
    let frame = response_frame(&[0u8; 39], 0);
    let result = read_frame(&mut Cursor::new(frame), TrackerCommand::Response, Some(40));
    assert!(matches!(result, Err(TrackerError::Protocol(_))));
}

#[test]
fn test_read_frame_wrong_command() {
    let frame = pack_header(TrackerCommand::ActiveTest.code(), 0, 0).to_vec();
    let result = read_frame(&mut Cursor::new(frame), TrackerCommand::Response, None);
    assert!(matches!(result, Err(TrackerError::Protocol(_))));
}

#[test]
fn test_read_frame_truncated_body() {
    let mut frame = response_frame(&[0u8; 39], 0);
    frame.truncate(HEADER_SIZE + 10);
    let result = read_frame(&mut Cursor::new(frame), TrackerCommand::Response, None);
    assert!(matches!(result, Err(TrackerError::Io(_))));
}
