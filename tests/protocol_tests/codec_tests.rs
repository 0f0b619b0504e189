//! Protocol codec tests
//!
//! Tests for request/reply framing at the engine boundary.

use std::io::Cursor;

use bytes::Bytes;

use atlaswire::protocol::{
    check_request_size, decode_reply, decode_request, encode_reply, encode_request, read_reply,
    read_request, write_reply, write_request, Reply, Request, RequestType, Status, HEADER_SIZE,
    MAX_PAYLOAD_SIZE,
};
use atlaswire::{
    ConflictRange, ConflictRangeType, MutationEncoder, MutationType, OptionEncoder, OptionParam,
    Scope, StreamingMode, TransactionOption, WireError,
};

fn roundtrip(request: &Request) -> Request {
    decode_request(&encode_request(request).unwrap()).unwrap()
}

// =============================================================================
// Request Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_set_option_with_payload() {
    let encoded = OptionEncoder::default()
        .encode(TransactionOption::Timeout, OptionParam::Int(5000))
        .unwrap();
    let request = Request::from(encoded);

    assert_eq!(request.request_type(), RequestType::SetOption);
    assert_eq!(roundtrip(&request), request);
}

#[test]
fn test_set_option_absent_payload_differs_from_empty() {
    let absent = Request::SetOption {
        scope: Scope::Transaction,
        code: 200,
        payload: None,
    };
    let empty = Request::SetOption {
        scope: Scope::Transaction,
        code: 200,
        payload: Some(Bytes::new()),
    };

    assert_ne!(encode_request(&absent).unwrap(), encode_request(&empty).unwrap());
    assert_eq!(roundtrip(&absent), absent);
    assert_eq!(roundtrip(&empty), empty);
}

#[test]
fn test_atomic_op_roundtrip() {
    let op = MutationEncoder::default()
        .encode(MutationType::Add, b"counter", &[1, 0, 0, 0])
        .unwrap();
    let request = Request::from(op);

    match roundtrip(&request) {
        Request::AtomicOp {
            opcode,
            key,
            param,
            versionstamp_pos,
        } => {
            assert_eq!(opcode, 2);
            assert_eq!(key, Bytes::from_static(b"counter"));
            assert_eq!(param, Bytes::from_static(&[1, 0, 0, 0]));
            assert_eq!(versionstamp_pos, None);
        }
        other => panic!("Expected ATOMIC_OP, got {:?}", other),
    }
}

#[test]
fn test_versionstamped_op_carries_offset() {
    let mut key = b"log/".to_vec();
    key.extend_from_slice(&[0u8; 10]);
    key.extend_from_slice(&4u32.to_le_bytes());

    let op = MutationEncoder::default()
        .encode(MutationType::SetVersionstampedKey, &key, b"entry")
        .unwrap();
    let request = Request::from(op);

    match roundtrip(&request) {
        Request::AtomicOp {
            opcode,
            key,
            versionstamp_pos,
            ..
        } => {
            assert_eq!(opcode, 14);
            assert_eq!(key.len(), 14);
            assert_eq!(versionstamp_pos, Some(4));
        }
        other => panic!("Expected ATOMIC_OP, got {:?}", other),
    }
}

#[test]
fn test_conflict_range_roundtrip() {
    let range = ConflictRange::new(b"a", b"c", ConflictRangeType::Write).unwrap();
    let request = Request::from(range);

    assert_eq!(request.request_type(), RequestType::AddConflictRange);
    assert_eq!(roundtrip(&request), request);
}

#[test]
fn test_range_read_roundtrip() {
    let request = Request::RangeRead {
        begin: Bytes::from_static(b"a"),
        end: Bytes::from_static(b"z"),
        limit: 100,
        mode: StreamingMode::WantAll,
        snapshot: true,
        reverse: false,
    };
    assert_eq!(roundtrip(&request), request);

    let reversed = Request::RangeRead {
        begin: Bytes::new(),
        end: Bytes::from_static(&[0xFF]),
        limit: 0,
        mode: StreamingMode::Serial,
        snapshot: false,
        reverse: true,
    };
    assert_eq!(roundtrip(&reversed), reversed);
}

#[test]
fn test_commit_roundtrip() {
    let encoded = encode_request(&Request::Commit).unwrap();
    assert_eq!(encoded, vec![0x05, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(decode_request(&encoded).unwrap(), Request::Commit);
}

#[test]
fn test_binary_data_passes_through() {
    let request = Request::AtomicOp {
        opcode: 8,
        key: Bytes::from_static(&[0x00, 0xFF, 0x00]),
        param: Bytes::from_static(&[0xFF, 0x00, 0xFF, 0x00]),
        versionstamp_pos: None,
    };
    assert_eq!(roundtrip(&request), request);
}

// =============================================================================
// Reply Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_reply_ok_with_payload() {
    let reply = Reply::Ok(Some(Bytes::from_static(b"rows")));
    let decoded = decode_reply(&encode_reply(&reply).unwrap()).unwrap();

    assert_eq!(decoded.status(), Status::Ok);
    assert_eq!(decoded, reply);
}

#[test]
fn test_reply_ok_no_payload() {
    let decoded = decode_reply(&encode_reply(&Reply::Ok(None)).unwrap()).unwrap();
    assert_eq!(decoded, Reply::Ok(None));
}

#[test]
fn test_reply_ok_empty_differs_from_absent() {
    let empty = Reply::Ok(Some(Bytes::new()));
    let encoded = encode_reply(&empty).unwrap();

    assert_ne!(encoded, encode_reply(&Reply::Ok(None)).unwrap());
    assert_eq!(decode_reply(&encoded).unwrap(), empty);
}

#[test]
fn test_reply_error_code() {
    let decoded = decode_reply(&encode_reply(&Reply::Error(1020)).unwrap()).unwrap();

    assert_eq!(decoded.status(), Status::Error);
    assert_eq!(decoded, Reply::Error(1020));
}

#[test]
fn test_reply_into_result_classifies() {
    let err = Reply::Error(1020).into_result().unwrap_err();
    let engine = err.engine_error().unwrap();

    assert_eq!(engine.code, 1020);
    assert!(engine.is_retryable());
    assert!(!engine.is_maybe_committed());
    assert!(!err.is_local());
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_incomplete_header() {
    let result = decode_request(&[0x01, 0x00, 0x00]);
    assert!(matches!(result, Err(WireError::Protocol(_))));
    assert!(result.unwrap_err().to_string().contains("Incomplete"));
}

#[test]
fn test_incomplete_payload() {
    let bytes = [0x05, 0x00, 0x00, 0x00, 0x0A, 0x00];
    let result = decode_request(&bytes);
    assert!(result.unwrap_err().to_string().contains("Incomplete"));
}

#[test]
fn test_unknown_request_type() {
    let result = decode_request(&[0xFF, 0x00, 0x00, 0x00, 0x00]);
    assert!(result.unwrap_err().to_string().contains("Unknown request type"));
}

#[test]
fn test_unknown_reply_status() {
    let result = decode_reply(&[0xFF, 0x00, 0x00, 0x00, 0x00]);
    assert!(result.unwrap_err().to_string().contains("Unknown reply status"));
}

#[test]
fn test_payload_too_large() {
    let bytes = [0x05, 0xFF, 0xFF, 0xFF, 0xFF];
    let result = decode_request(&bytes);
    assert!(result.unwrap_err().to_string().contains("too large"));
}

#[test]
fn test_commit_with_unexpected_payload() {
    let bytes = [0x05, 0x00, 0x00, 0x00, 0x01, 0x00];
    let result = decode_request(&bytes);
    assert!(result.unwrap_err().to_string().contains("trailing"));
}

#[test]
fn test_unknown_conflict_kind() {
    let bytes = [0x03, 0x00, 0x00, 0x00, 0x05, 0x07, 0x00, 0x00, 0x00, 0x00];
    assert!(matches!(decode_request(&bytes), Err(WireError::Protocol(_))));
}

#[test]
fn test_unknown_streaming_mode() {
    let mut bytes = vec![0x04, 0x00, 0x00, 0x00, 0x0D];
    bytes.extend_from_slice(&42i32.to_be_bytes());
    bytes.extend_from_slice(&0i32.to_be_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&0u32.to_be_bytes());

    assert!(matches!(
        decode_request(&bytes),
        Err(WireError::InvalidStreamingMode(_))
    ));
}

#[test]
fn test_ok_reply_missing_presence_flag() {
    let result = decode_reply(&[0x00, 0x00, 0x00, 0x00, 0x00]);
    assert!(matches!(result, Err(WireError::Protocol(_))));
}

#[test]
fn test_oversize_request_rejected_before_write() {
    let request = Request::SetOption {
        scope: Scope::Transaction,
        code: 403,
        payload: Some(Bytes::from(vec![b'x'; MAX_PAYLOAD_SIZE as usize + 1])),
    };

    assert!(check_request_size(&request).is_err());
    let err = encode_request(&request).unwrap_err();
    assert!(matches!(err, WireError::Protocol(_)));
    assert!(err.to_string().contains("too large"));

    let mut buffer = Vec::new();
    assert!(write_request(&mut buffer, &request).is_err());
    assert!(buffer.is_empty());
}

#[test]
fn test_request_at_size_limit_encodes() {
    // scope (1) + code (4) + presence (1) + option bytes fill the frame exactly
    let request = Request::SetOption {
        scope: Scope::Transaction,
        code: 403,
        payload: Some(Bytes::from(vec![b'x'; MAX_PAYLOAD_SIZE as usize - 6])),
    };

    assert!(check_request_size(&request).is_ok());
    let encoded = encode_request(&request).unwrap();
    assert_eq!(encoded.len(), HEADER_SIZE + MAX_PAYLOAD_SIZE as usize);
    assert_eq!(decode_request(&encoded).unwrap(), request);
}

#[test]
fn test_check_request_size_matches_encoding() {
    let requests = [
        Request::AtomicOp {
            opcode: 14,
            key: Bytes::from_static(b"key"),
            param: Bytes::from_static(b"value"),
            versionstamp_pos: Some(0),
        },
        Request::AddConflictRange {
            begin: Bytes::from_static(b"a"),
            end: Bytes::from_static(b"b"),
            kind: ConflictRangeType::Read,
        },
        Request::RangeRead {
            begin: Bytes::from_static(b"a"),
            end: Bytes::from_static(b"z"),
            limit: 0,
            mode: StreamingMode::Iterator,
            snapshot: false,
            reverse: false,
        },
    ];
    for request in &requests {
        let encoded = encode_request(request).unwrap();
        let payload_len = u32::from_be_bytes([encoded[1], encoded[2], encoded[3], encoded[4]]);
        assert_eq!(payload_len as usize, encoded.len() - HEADER_SIZE);
        assert!(check_request_size(request).is_ok());
    }
}

#[test]
fn test_truncated_error_reply() {
    let result = decode_reply(&[0x01, 0x00, 0x00, 0x00, 0x02, 0x03, 0xFC]);
    assert!(result.is_err());
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_request() {
    let request = Request::AddConflictRange {
        begin: Bytes::from_static(b"k"),
        end: Bytes::from_static(b"k\x00"),
        kind: ConflictRangeType::Read,
    };

    let mut buffer = Vec::new();
    write_request(&mut buffer, &request).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_request(&mut cursor).unwrap(), request);
}

#[test]
fn test_stream_multiple_replies() {
    let replies = vec![
        Reply::Ok(Some(Bytes::from_static(b"data"))),
        Reply::Error(1007),
        Reply::Ok(None),
    ];

    let mut buffer = Vec::new();
    for reply in &replies {
        write_reply(&mut buffer, reply).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &replies {
        assert_eq!(&read_reply(&mut cursor).unwrap(), expected);
    }
}

#[test]
fn test_stream_eof_is_io_error() {
    let mut cursor = Cursor::new(vec![0x00, 0x00]);
    assert!(matches!(read_reply(&mut cursor), Err(WireError::Io(_))));
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_set_option() {
    let request = Request::SetOption {
        scope: Scope::Transaction,
        code: 500,
        payload: Some(Bytes::copy_from_slice(&5000i64.to_le_bytes())),
    };
    let encoded = encode_request(&request).unwrap();

    // [0x01][len = 14][scope 2][code 500][present 1][8 LE bytes]
    assert_eq!(encoded[0], 0x01);
    assert_eq!(&encoded[1..HEADER_SIZE], &[0x00, 0x00, 0x00, 0x0E]);
    assert_eq!(encoded[5], 2);
    assert_eq!(&encoded[6..10], &500u32.to_be_bytes());
    assert_eq!(encoded[10], 1);
    assert_eq!(&encoded[11..19], &[0x88, 0x13, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_wire_format_ok_reply() {
    let encoded = encode_reply(&Reply::Ok(Some(Bytes::from_static(b"hi")))).unwrap();

    // [0x00][len = 3][present 1][h i]
    assert_eq!(encoded, vec![0x00, 0x00, 0x00, 0x00, 0x03, 0x01, b'h', b'i']);
}

#[test]
fn test_wire_format_error_reply() {
    let encoded = encode_reply(&Reply::Error(1020)).unwrap();

    // [0x01][len = 4][code BE]
    assert_eq!(encoded[0], 0x01);
    assert_eq!(&encoded[1..5], &[0x00, 0x00, 0x00, 0x04]);
    assert_eq!(&encoded[5..9], &1020i32.to_be_bytes());
}
