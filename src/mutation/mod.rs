//! Mutation Module
//!
//! Atomic read-modify-write operations applied by the engine at commit time.
//!
//! ## Responsibilities
//! - Map each mutation kind to its stable opcode
//! - Resolve legacy alias names onto the canonical kind
//! - Validate the statically checkable shape of key and parameter
//! - Reproduce the engine's combination rules for building test vectors
//!
//! ## Combination Rules
//! ```text
//! Opcode  Kind                     Rule
//! ──────  ───────────────────────  ─────────────────────────────────────────────
//!  2      Add                      little-endian add, result has param's length
//!  6      BitAnd   (alias And)     bytewise and, absent existing ⇒ param
//!  7      BitOr    (alias Or)      bytewise or
//!  8      BitXor   (alias Xor)     bytewise xor
//!  9      AppendIfFits             existing ++ param if it fits, else silently dropped
//! 12      Max                      little-endian max
//! 13      Min                      little-endian min, absent existing ⇒ param
//! 14      SetVersionstampedKey     key gets a versionstamp at commit
//! 15      SetVersionstampedValue   value gets a versionstamp at commit
//! 16      ByteMin                  lexicographic min, absent existing ⇒ param
//! 17      ByteMax                  lexicographic max, absent existing ⇒ param
//! 20      CompareAndClear          clear if existing == param
//! ```
//!
//! For the numeric and bitwise rules the existing value is first reconciled
//! to the parameter's length: zero-extended at the high-order (right) end if
//! shorter, truncated if longer.
//!
//! `AppendIfFits` never reports an overflow. The engine drops the mutation at
//! commit time and nothing surfaces to the caller.

mod apply;
mod codec;

use std::fmt;
use std::str::FromStr;

pub use apply::{apply_mutation, MutationOutcome};
pub use codec::{AtomicOp, MutationEncoder};

use crate::error::{Result, WireError};

/// Atomic mutation kind
///
/// Legacy names (`And`, `Or`, `Xor`) are not separate variants; they resolve
/// to `BitAnd`, `BitOr` and `BitXor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MutationType {
    Add = 2,
    BitAnd = 6,
    BitOr = 7,
    BitXor = 8,
    AppendIfFits = 9,
    Max = 12,
    Min = 13,
    SetVersionstampedKey = 14,
    SetVersionstampedValue = 15,
    ByteMin = 16,
    ByteMax = 17,
    CompareAndClear = 20,
}

/// Accepted names: (name, kind, deprecated alias)
const NAMES: &[(&str, MutationType, bool)] = &[
    ("add", MutationType::Add, false),
    ("bit_and", MutationType::BitAnd, false),
    ("and", MutationType::BitAnd, true),
    ("bit_or", MutationType::BitOr, false),
    ("or", MutationType::BitOr, true),
    ("bit_xor", MutationType::BitXor, false),
    ("xor", MutationType::BitXor, true),
    ("append_if_fits", MutationType::AppendIfFits, false),
    ("max", MutationType::Max, false),
    ("min", MutationType::Min, false),
    ("set_versionstamped_key", MutationType::SetVersionstampedKey, false),
    ("set_versionstamped_value", MutationType::SetVersionstampedValue, false),
    ("byte_min", MutationType::ByteMin, false),
    ("byte_max", MutationType::ByteMax, false),
    ("compare_and_clear", MutationType::CompareAndClear, false),
];

impl MutationType {
    pub const ALL: [MutationType; 12] = [
        MutationType::Add,
        MutationType::BitAnd,
        MutationType::BitOr,
        MutationType::BitXor,
        MutationType::AppendIfFits,
        MutationType::Max,
        MutationType::Min,
        MutationType::SetVersionstampedKey,
        MutationType::SetVersionstampedValue,
        MutationType::ByteMin,
        MutationType::ByteMax,
        MutationType::CompareAndClear,
    ];

    /// Wire opcode
    pub fn opcode(self) -> u8 {
        self as u8
    }

    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, kind, deprecated)| *kind == self && !deprecated)
            .map(|(name, _, _)| *name)
            .unwrap_or("unknown")
    }

    /// Resolve a name or alias. Returns the kind and whether the name is a
    /// deprecated alias.
    pub fn resolve(name: &str) -> Result<(MutationType, bool)> {
        let wanted = name.replace('-', "_");
        NAMES
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(&wanted) || n.replace('_', "").eq_ignore_ascii_case(&wanted))
            .map(|(_, kind, deprecated)| (*kind, *deprecated))
            .ok_or_else(|| WireError::UnknownMutation(name.to_string()))
    }

    /// Whether this kind writes a versionstamp at commit time
    pub fn is_versionstamped(self) -> bool {
        matches!(
            self,
            MutationType::SetVersionstampedKey | MutationType::SetVersionstampedValue
        )
    }
}

impl TryFrom<u8> for MutationType {
    type Error = WireError;

    fn try_from(opcode: u8) -> Result<Self> {
        MutationType::ALL
            .iter()
            .copied()
            .find(|k| k.opcode() == opcode)
            .ok_or_else(|| WireError::UnknownMutation(format!("opcode {}", opcode)))
    }
}

impl FromStr for MutationType {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        MutationType::resolve(s).map(|(kind, _)| kind)
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
