//! Protocol codec
//!
//! Encoding and decoding functions for the engine boundary.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Type (1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Request Type
//! - SET_OPTION:     scope (1) + code (4) + present (1) + option bytes
//! - ATOMIC_OP:      opcode (1) + key_len (4) + key + has_pos (1) [+ pos (4)] + param
//! - CONFLICT_RANGE: kind (1) + begin_len (4) + begin + end
//! - RANGE_READ:     mode (4) + limit (4) + flags (1) + begin_len (4) + begin + end
//! - COMMIT:         empty
//!
//! ### Reply Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//! An OK reply's payload is a presence byte followed by the result bytes, so
//! an empty result and no result stay distinct. An error reply's payload is
//! the 4-byte error code.
//!
//! Header integers are big-endian. Option bytes and mutation parameters are
//! passed through exactly as encoded.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::conflict::ConflictRangeType;
use crate::error::{Result, WireError};
use crate::options::Scope;
use crate::streaming::StreamingMode;

use super::{Reply, Request, Status};

/// Header size: 1 byte type/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const FLAG_SNAPSHOT: u8 = 0x01;
const FLAG_REVERSE: u8 = 0x02;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: type (1) + payload_len (4) + payload
///
/// Fails with `Protocol` when the payload exceeds `MAX_PAYLOAD_SIZE`.
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    let mut payload = BytesMut::new();

    match request {
        Request::SetOption { scope, code, payload: value } => {
            payload.put_u8(scope_tag(*scope));
            payload.put_u32(*code);
            match value {
                Some(bytes) => {
                    payload.put_u8(1);
                    payload.put_slice(bytes);
                }
                None => payload.put_u8(0),
            }
        }
        Request::AtomicOp {
            opcode,
            key,
            param,
            versionstamp_pos,
        } => {
            payload.put_u8(*opcode);
            put_len_prefixed(&mut payload, key);
            match versionstamp_pos {
                Some(pos) => {
                    payload.put_u8(1);
                    payload.put_u32(*pos);
                }
                None => payload.put_u8(0),
            }
            payload.put_slice(param);
        }
        Request::AddConflictRange { begin, end, kind } => {
            payload.put_u8(kind.tag());
            put_len_prefixed(&mut payload, begin);
            payload.put_slice(end);
        }
        Request::RangeRead {
            begin,
            end,
            limit,
            mode,
            snapshot,
            reverse,
        } => {
            payload.put_i32(mode.value());
            payload.put_i32(*limit);
            let mut flags = 0u8;
            if *snapshot {
                flags |= FLAG_SNAPSHOT;
            }
            if *reverse {
                flags |= FLAG_REVERSE;
            }
            payload.put_u8(flags);
            put_len_prefixed(&mut payload, begin);
            payload.put_slice(end);
        }
        Request::Commit => {}
    }

    frame(request.request_type() as u8, &payload)
}

/// Check that a request fits in one frame without encoding it
pub fn check_request_size(request: &Request) -> Result<()> {
    let payload_len = match request {
        Request::SetOption { payload, .. } => 6 + payload.as_ref().map_or(0, |p| p.len()),
        Request::AtomicOp {
            key,
            param,
            versionstamp_pos,
            ..
        } => 6 + key.len() + param.len() + versionstamp_pos.map_or(0, |_| 4),
        Request::AddConflictRange { begin, end, .. } => 5 + begin.len() + end.len(),
        Request::RangeRead { begin, end, .. } => 13 + begin.len() + end.len(),
        Request::Commit => 0,
    };

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(WireError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let (type_byte, payload) = split_frame(bytes, "request")?;
    let mut cursor = Cursor::new(payload);

    match type_byte {
        0x01 => {
            let scope = scope_from_tag(cursor.u8("SET_OPTION scope")?)?;
            let code = cursor.u32("SET_OPTION code")?;
            let value = match cursor.u8("SET_OPTION presence flag")? {
                0 => {
                    cursor.expect_end("SET_OPTION")?;
                    None
                }
                _ => Some(cursor.rest()),
            };
            Ok(Request::SetOption {
                scope,
                code,
                payload: value,
            })
        }
        0x02 => {
            let opcode = cursor.u8("ATOMIC_OP opcode")?;
            let key = cursor.len_prefixed("ATOMIC_OP key")?;
            let versionstamp_pos = match cursor.u8("ATOMIC_OP offset flag")? {
                0 => None,
                _ => Some(cursor.u32("ATOMIC_OP offset")?),
            };
            Ok(Request::AtomicOp {
                opcode,
                key,
                param: cursor.rest(),
                versionstamp_pos,
            })
        }
        0x03 => {
            let kind = ConflictRangeType::try_from(cursor.u8("CONFLICT_RANGE kind")?)?;
            let begin = cursor.len_prefixed("CONFLICT_RANGE begin")?;
            Ok(Request::AddConflictRange {
                begin,
                end: cursor.rest(),
                kind,
            })
        }
        0x04 => {
            let mode = StreamingMode::try_from(cursor.i32("RANGE_READ mode")?)?;
            let limit = cursor.i32("RANGE_READ limit")?;
            let flags = cursor.u8("RANGE_READ flags")?;
            let begin = cursor.len_prefixed("RANGE_READ begin")?;
            Ok(Request::RangeRead {
                begin,
                end: cursor.rest(),
                limit,
                mode,
                snapshot: flags & FLAG_SNAPSHOT != 0,
                reverse: flags & FLAG_REVERSE != 0,
            })
        }
        0x05 => {
            cursor.expect_end("COMMIT")?;
            Ok(Request::Commit)
        }
        _ => Err(WireError::Protocol(format!(
            "Unknown request type: 0x{:02x}",
            type_byte
        ))),
    }
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_reply(reply: &Reply) -> Result<Vec<u8>> {
    match reply {
        Reply::Ok(None) => frame(Status::Ok as u8, &[0]),
        Reply::Ok(Some(bytes)) => {
            let mut payload = BytesMut::with_capacity(1 + bytes.len());
            payload.put_u8(1);
            payload.put_slice(bytes);
            frame(Status::Ok as u8, &payload)
        }
        Reply::Error(code) => frame(Status::Error as u8, &code.to_be_bytes()),
    }
}

/// Decode a reply from bytes
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let (status_byte, payload) = split_frame(bytes, "reply")?;

    match status_byte {
        0x00 => {
            let mut cursor = Cursor::new(payload);
            match cursor.u8("OK presence flag")? {
                0 => {
                    cursor.expect_end("OK")?;
                    Ok(Reply::Ok(None))
                }
                _ => Ok(Reply::Ok(Some(cursor.rest()))),
            }
        }
        0x01 => {
            let mut cursor = Cursor::new(payload);
            let code = cursor.i32("ERROR code")?;
            cursor.expect_end("ERROR")?;
            Ok(Reply::Error(code))
        }
        _ => Err(WireError::Protocol(format!(
            "Unknown reply status: 0x{:02x}",
            status_byte
        ))),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let message = read_frame(reader)?;
    decode_request(&message)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete reply from a stream
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let message = read_frame(reader)?;
    decode_reply(&message)
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let bytes = encode_reply(reply)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Framing helpers
// =============================================================================

fn frame(type_byte: u8, payload: &[u8]) -> Result<Vec<u8>> {
    let payload_len = u32::try_from(payload.len()).map_err(|_| {
        WireError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload.len(),
            MAX_PAYLOAD_SIZE
        ))
    })?;
    check_payload_len(payload_len)?;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(type_byte);
    message.extend_from_slice(&payload_len.to_be_bytes());
    message.extend_from_slice(payload);
    Ok(message)
}

fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(WireError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    check_payload_len(payload_len)?;

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(WireError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    check_payload_len(payload_len)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len as usize];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }
    Ok(message)
}

fn check_payload_len(payload_len: u32) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(WireError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

fn put_len_prefixed(buf: &mut BytesMut, bytes: &[u8]) {
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

fn scope_tag(scope: Scope) -> u8 {
    match scope {
        Scope::Network => 0,
        Scope::Database => 1,
        Scope::Transaction => 2,
    }
}

fn scope_from_tag(tag: u8) -> Result<Scope> {
    match tag {
        0 => Ok(Scope::Network),
        1 => Ok(Scope::Database),
        2 => Ok(Scope::Transaction),
        _ => Err(WireError::Protocol(format!("Unknown option scope: 0x{:02x}", tag))),
    }
}

/// Bounds-checked reader over a payload
struct Cursor<'a> {
    buf: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(WireError::Protocol(format!(
                "{}: expected {} bytes, got {}",
                what,
                n,
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32(&mut self, what: &str) -> Result<i32> {
        let b = self.take(4, what)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn len_prefixed(&mut self, what: &str) -> Result<Bytes> {
        let len = self.u32(what)? as usize;
        Ok(Bytes::copy_from_slice(self.take(len, what)?))
    }

    fn rest(&mut self) -> Bytes {
        let rest = Bytes::copy_from_slice(self.buf);
        self.buf = &[];
        rest
    }

    fn expect_end(&self, what: &str) -> Result<()> {
        if !self.buf.is_empty() {
            return Err(WireError::Protocol(format!(
                "{}: unexpected trailing {} bytes",
                what,
                self.buf.len()
            )));
        }
        Ok(())
    }
}
