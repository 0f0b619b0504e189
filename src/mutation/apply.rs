//! Reference evaluator
//!
//! Reproduces the engine's combination rules so expected results can be
//! computed offline. Nothing here is sent over the wire.

use std::cmp::Ordering;

use crate::error::{Result, WireError};

use super::MutationType;

/// What the engine does to the key after applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Key now holds these bytes
    Set(Vec<u8>),
    /// Key is cleared
    Clear,
    /// Key keeps whatever it held (including being absent)
    Unchanged,
}

/// Apply `kind` to an existing value the way the engine does at commit
///
/// `max_value_size` only matters for `AppendIfFits`. Versionstamped kinds
/// need the commit versionstamp and fail with `CommitTimeOnly`.
pub fn apply_mutation(
    kind: MutationType,
    existing: Option<&[u8]>,
    param: &[u8],
    max_value_size: usize,
) -> Result<MutationOutcome> {
    let outcome = match kind {
        MutationType::Add => MutationOutcome::Set(add(&reconcile(existing, param.len()), param)),
        MutationType::BitAnd => match existing {
            None => MutationOutcome::Set(param.to_vec()),
            Some(v) => MutationOutcome::Set(bitwise(&reconcile(Some(v), param.len()), param, |a, b| a & b)),
        },
        MutationType::BitOr => {
            MutationOutcome::Set(bitwise(&reconcile(existing, param.len()), param, |a, b| a | b))
        }
        MutationType::BitXor => {
            MutationOutcome::Set(bitwise(&reconcile(existing, param.len()), param, |a, b| a ^ b))
        }
        MutationType::AppendIfFits => match existing {
            None => MutationOutcome::Set(param.to_vec()),
            Some(v) if v.is_empty() => MutationOutcome::Set(param.to_vec()),
            // Dropped silently; the engine surfaces nothing.
            Some(v) if v.len() + param.len() > max_value_size => MutationOutcome::Unchanged,
            Some(v) => {
                let mut out = Vec::with_capacity(v.len() + param.len());
                out.extend_from_slice(v);
                out.extend_from_slice(param);
                MutationOutcome::Set(out)
            }
        },
        MutationType::Max => match existing {
            None => MutationOutcome::Set(param.to_vec()),
            Some(v) if v.is_empty() => MutationOutcome::Set(param.to_vec()),
            Some(v) => {
                let current = reconcile(Some(v), param.len());
                if compare_le(param, &current) == Ordering::Less {
                    MutationOutcome::Set(current)
                } else {
                    MutationOutcome::Set(param.to_vec())
                }
            }
        },
        MutationType::Min => match existing {
            None => MutationOutcome::Set(param.to_vec()),
            Some(v) => {
                let current = reconcile(Some(v), param.len());
                if compare_le(param, &current) == Ordering::Greater {
                    MutationOutcome::Set(current)
                } else {
                    MutationOutcome::Set(param.to_vec())
                }
            }
        },
        MutationType::ByteMin => match existing {
            Some(v) if v < param => MutationOutcome::Set(v.to_vec()),
            _ => MutationOutcome::Set(param.to_vec()),
        },
        MutationType::ByteMax => match existing {
            Some(v) if v > param => MutationOutcome::Set(v.to_vec()),
            _ => MutationOutcome::Set(param.to_vec()),
        },
        MutationType::CompareAndClear => match existing {
            Some(v) if v == param => MutationOutcome::Clear,
            _ => MutationOutcome::Unchanged,
        },
        MutationType::SetVersionstampedKey | MutationType::SetVersionstampedValue => {
            return Err(WireError::CommitTimeOnly(kind));
        }
    };

    Ok(outcome)
}

/// Zero-extend (at the high end) or truncate the existing value to `len`
fn reconcile(existing: Option<&[u8]>, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    if let Some(v) = existing {
        let n = v.len().min(len);
        out[..n].copy_from_slice(&v[..n]);
    }
    out
}

/// Little-endian addition with carry, overflow discarded
fn add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut carry = 0u16;
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let sum = x as u16 + y as u16 + carry;
            carry = sum >> 8;
            sum as u8
        })
        .collect()
}

fn bitwise(a: &[u8], b: &[u8], op: impl Fn(u8, u8) -> u8) -> Vec<u8> {
    a.iter().zip(b).map(|(&x, &y)| op(x, y)).collect()
}

/// Compare two equal-length little-endian unsigned integers
fn compare_le(a: &[u8], b: &[u8]) -> Ordering {
    a.iter().rev().cmp(b.iter().rev())
}
