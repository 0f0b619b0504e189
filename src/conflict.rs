//! Conflict Range Module
//!
//! Records the read/write key ranges a transaction registers for
//! optimistic conflict detection.
//!
//! ## Responsibilities
//! - Append `[begin, end)` ranges in call order
//! - Expand single keys to `[key, key + 0x00)`
//! - Hand the list to the engine unmerged
//!
//! Merging, deduplication and the implicit ranges generated by writes are
//! the engine's business.

use bytes::Bytes;

use crate::error::{Result, WireError};

/// Kind of conflict range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConflictRangeType {
    Read = 0,
    Write = 1,
}

impl ConflictRangeType {
    /// Wire tag
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ConflictRangeType {
    type Error = WireError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(ConflictRangeType::Read),
            1 => Ok(ConflictRangeType::Write),
            _ => Err(WireError::Protocol(format!(
                "Unknown conflict range type: 0x{:02x}",
                tag
            ))),
        }
    }
}

/// A half-open key interval `[begin, end)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRange {
    pub begin: Bytes,
    pub end: Bytes,
    pub kind: ConflictRangeType,
}

impl ConflictRange {
    /// Build a range, checking `begin <= end`
    pub fn new(begin: &[u8], end: &[u8], kind: ConflictRangeType) -> Result<Self> {
        if begin > end {
            return Err(WireError::InvalidConflictRange);
        }
        Ok(Self {
            begin: Bytes::copy_from_slice(begin),
            end: Bytes::copy_from_slice(end),
            kind,
        })
    }

    /// Range covering exactly one key
    pub fn single_key(key: &[u8], kind: ConflictRangeType) -> Self {
        Self {
            begin: Bytes::copy_from_slice(key),
            end: Bytes::from(key_after(key)),
            kind,
        }
    }
}

/// Smallest key sorting after `key`
pub fn key_after(key: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + 1);
    out.extend_from_slice(key);
    out.push(0x00);
    out
}

/// Per-transaction list of conflict ranges
///
/// Owned by exactly one transaction; all mutation goes through `&mut self`.
#[derive(Debug, Default, Clone)]
pub struct ConflictRangeTracker {
    ranges: Vec<ConflictRange>,
}

impl ConflictRangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a range. Overlaps and duplicates are kept as-is.
    pub fn add_range(&mut self, begin: &[u8], end: &[u8], kind: ConflictRangeType) -> Result<()> {
        let range = ConflictRange::new(begin, end, kind)?;
        tracing::trace!(?kind, begin_len = begin.len(), end_len = end.len(), "Added conflict range");
        self.ranges.push(range);
        Ok(())
    }

    /// Append `[key, key + 0x00)`
    pub fn add_key(&mut self, key: &[u8], kind: ConflictRangeType) {
        tracing::trace!(?kind, key_len = key.len(), "Added conflict key");
        self.ranges.push(ConflictRange::single_key(key, kind));
    }

    /// All ranges in insertion order
    pub fn ranges(&self) -> &[ConflictRange] {
        &self.ranges
    }

    /// Ranges of one kind, in insertion order
    pub fn ranges_of(&self, kind: ConflictRangeType) -> impl Iterator<Item = &ConflictRange> {
        self.ranges.iter().filter(move |r| r.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Remove and return every range (used when committing)
    pub fn take(&mut self) -> Vec<ConflictRange> {
        std::mem::take(&mut self.ranges)
    }

    /// Drop every range (transaction reset)
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}
