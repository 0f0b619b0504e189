//! Versionstamp Module
//!
//! Byte-offset transform for versionstamped keys and values.
//!
//! ## Buffer Layout (current convention)
//! ```text
//! ┌──────────────────────────────────────────────┬──────────────┐
//! │                effective payload              │ pos (4, LE)  │
//! │        ... [pos, pos + 10) is overwritten ... │              │
//! └──────────────────────────────────────────────┴──────────────┘
//! ```
//!
//! The engine substitutes the 10-byte versionstamp at commit time:
//! ```text
//! ┌───────────────────────────────┬──────────────┐
//! │ committed version (8, BE)     │ batch (2, BE)│
//! └───────────────────────────────┴──────────────┘
//! ```
//!
//! ## Legacy Convention (API version < 520)
//! - keys carry a 2-byte little-endian offset suffix
//! - values carry no suffix; the versionstamp always sits at offset 0

use bytes::Bytes;

use crate::error::{Result, WireError};

/// Size of a versionstamp on the wire
pub const VERSIONSTAMP_SIZE: usize = 10;

/// First API version using the 4-byte offset suffix
pub const CURRENT_CONVENTION_API_VERSION: u32 = 520;

// =============================================================================
// Versionstamp
// =============================================================================

/// A committed versionstamp: 8-byte commit version + 2-byte batch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Versionstamp {
    pub version: u64,
    pub batch: u16,
}

impl Versionstamp {
    /// Placeholder bytes callers conventionally write where the stamp will go
    pub const INCOMPLETE: [u8; VERSIONSTAMP_SIZE] = [0xFF; VERSIONSTAMP_SIZE];

    pub fn new(version: u64, batch: u16) -> Self {
        Self { version, batch }
    }

    /// Serialize as 10 big-endian bytes
    pub fn to_bytes(&self) -> [u8; VERSIONSTAMP_SIZE] {
        let mut out = [0u8; VERSIONSTAMP_SIZE];
        out[..8].copy_from_slice(&self.version.to_be_bytes());
        out[8..].copy_from_slice(&self.batch.to_be_bytes());
        out
    }

    /// Parse 10 big-endian bytes
    pub fn from_bytes(bytes: [u8; VERSIONSTAMP_SIZE]) -> Self {
        let mut version = [0u8; 8];
        version.copy_from_slice(&bytes[..8]);
        Self {
            version: u64::from_be_bytes(version),
            batch: u16::from_be_bytes([bytes[8], bytes[9]]),
        }
    }
}

// =============================================================================
// Transform
// =============================================================================

/// Which buffer the versionstamp is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampTarget {
    /// `SetVersionstampedKey`
    Key,
    /// `SetVersionstampedValue`
    Value,
}

/// How the offset is carried in the caller's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetConvention {
    /// Pre-520: 2-byte key suffix, no value suffix
    Legacy,
    /// 4-byte little-endian suffix for both keys and values
    Current,
}

impl OffsetConvention {
    /// Pick the convention for a negotiated API version
    pub fn for_api_version(api_version: u32) -> Self {
        if api_version < CURRENT_CONVENTION_API_VERSION {
            OffsetConvention::Legacy
        } else {
            OffsetConvention::Current
        }
    }

    /// Width of the offset suffix for a target
    pub fn suffix_len(self, target: StampTarget) -> usize {
        match (self, target) {
            (OffsetConvention::Current, _) => 4,
            (OffsetConvention::Legacy, StampTarget::Key) => 2,
            (OffsetConvention::Legacy, StampTarget::Value) => 0,
        }
    }
}

/// A validated versionstamp request
///
/// Holds the effective payload (suffix removed) and the resolved offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionstampTransform {
    target: StampTarget,
    payload: Bytes,
    pos: u32,
}

impl VersionstampTransform {
    /// Effective payload sent to the engine
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Offset of the 10-byte window
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Byte window the engine overwrites
    pub fn window(&self) -> std::ops::Range<usize> {
        let start = self.pos as usize;
        start..start + VERSIONSTAMP_SIZE
    }

    pub fn target(&self) -> StampTarget {
        self.target
    }

    /// Reproduce the engine's substitution for a given versionstamp
    pub fn apply(&self, stamp: &Versionstamp) -> Vec<u8> {
        let mut out = self.payload.to_vec();
        out[self.window()].copy_from_slice(&stamp.to_bytes());
        out
    }
}

/// Validate a caller buffer and resolve its versionstamp offset
///
/// Fails with `VersionstampOffsetOutOfRange` when the 10-byte window does not
/// fit inside the payload left after stripping the suffix.
pub fn prepare_versionstamped(
    buffer: &[u8],
    target: StampTarget,
    convention: OffsetConvention,
) -> Result<VersionstampTransform> {
    let suffix_len = convention.suffix_len(target);

    if buffer.len() < suffix_len {
        return Err(WireError::VersionstampOffsetOutOfRange {
            pos: 0,
            payload_len: 0,
        });
    }

    let (payload, suffix) = buffer.split_at(buffer.len() - suffix_len);
    let pos = match suffix_len {
        4 => u32::from_le_bytes([suffix[0], suffix[1], suffix[2], suffix[3]]),
        2 => u16::from_le_bytes([suffix[0], suffix[1]]) as u32,
        _ => 0,
    };

    let end = pos as u64 + VERSIONSTAMP_SIZE as u64;
    if end > payload.len() as u64 {
        return Err(WireError::VersionstampOffsetOutOfRange {
            pos,
            payload_len: payload.len(),
        });
    }

    tracing::trace!(?target, ?convention, pos, len = payload.len(), "Prepared versionstamp");

    Ok(VersionstampTransform {
        target,
        payload: Bytes::copy_from_slice(payload),
        pos,
    })
}

/// Build a current-convention buffer: payload followed by a 4-byte LE offset
pub fn with_offset_suffix(payload: &[u8], pos: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 4);
    out.extend_from_slice(payload);
    out.extend_from_slice(&pos.to_le_bytes());
    out
}
