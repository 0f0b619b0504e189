//! Request definitions
//!
//! Outbound calls to the engine, already encoded per option, mutation and
//! conflict-range rules.

use bytes::Bytes;

use crate::conflict::{ConflictRange, ConflictRangeType};
use crate::mutation::AtomicOp;
use crate::options::{EncodedOption, Scope};
use crate::streaming::StreamingMode;

/// Request types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    SetOption = 0x01,
    AtomicOp = 0x02,
    AddConflictRange = 0x03,
    RangeRead = 0x04,
    Commit = 0x05,
}

/// A request to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Apply an option
    SetOption {
        scope: Scope,
        code: u32,
        payload: Option<Bytes>,
    },

    /// Queue an atomic mutation
    AtomicOp {
        opcode: u8,
        key: Bytes,
        param: Bytes,
        versionstamp_pos: Option<u32>,
    },

    /// Register a conflict range
    AddConflictRange {
        begin: Bytes,
        end: Bytes,
        kind: ConflictRangeType,
    },

    /// Read `[begin, end)`
    RangeRead {
        begin: Bytes,
        end: Bytes,
        limit: i32,
        mode: StreamingMode,
        snapshot: bool,
        reverse: bool,
    },

    /// Commit everything sent so far
    Commit,
}

impl Request {
    /// Get the request type
    pub fn request_type(&self) -> RequestType {
        match self {
            Request::SetOption { .. } => RequestType::SetOption,
            Request::AtomicOp { .. } => RequestType::AtomicOp,
            Request::AddConflictRange { .. } => RequestType::AddConflictRange,
            Request::RangeRead { .. } => RequestType::RangeRead,
            Request::Commit => RequestType::Commit,
        }
    }
}

impl From<EncodedOption> for Request {
    fn from(o: EncodedOption) -> Self {
        Request::SetOption {
            scope: o.scope,
            code: o.code,
            payload: o.payload,
        }
    }
}

impl From<AtomicOp> for Request {
    fn from(op: AtomicOp) -> Self {
        Request::AtomicOp {
            opcode: op.opcode(),
            key: op.key,
            param: op.param,
            versionstamp_pos: op.versionstamp_pos,
        }
    }
}

impl From<ConflictRange> for Request {
    fn from(r: ConflictRange) -> Self {
        Request::AddConflictRange {
            begin: r.begin,
            end: r.end,
            kind: r.kind,
        }
    }
}
