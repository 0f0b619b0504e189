//! Mutation codec
//!
//! Produces the `(key, param, opcode)` triple for an atomic operation after
//! the checks that can be made without knowing the stored value.

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{Result, WireError};
use crate::versionstamp::{prepare_versionstamped, OffsetConvention, StampTarget};

use super::MutationType;

/// An atomic operation ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicOp {
    pub kind: MutationType,
    pub key: Bytes,
    pub param: Bytes,
    /// Resolved versionstamp offset for versionstamped kinds. The offset
    /// suffix is already stripped from `key` / `param`.
    pub versionstamp_pos: Option<u32>,
}

impl AtomicOp {
    /// Wire opcode
    pub fn opcode(&self) -> u8 {
        self.kind.opcode()
    }
}

/// Validates and encodes atomic operations
#[derive(Debug, Clone)]
pub struct MutationEncoder {
    max_key_size: usize,
    max_value_size: usize,
    convention: OffsetConvention,
    warn_on_deprecated: bool,
}

impl Default for MutationEncoder {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl MutationEncoder {
    /// Create an encoder from client config
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            max_key_size: config.max_key_size,
            max_value_size: config.max_value_size,
            convention: config.offset_convention(),
            warn_on_deprecated: config.warn_on_deprecated,
        }
    }

    /// Offset convention in effect
    pub fn convention(&self) -> OffsetConvention {
        self.convention
    }

    /// Encode an atomic operation
    ///
    /// Only length limits and versionstamp offsets are checked. Outcomes that
    /// depend on the stored value (such as an `AppendIfFits` overflow) are
    /// decided by the engine at commit time and never reported here.
    pub fn encode(&self, kind: MutationType, key: &[u8], param: &[u8]) -> Result<AtomicOp> {
        let (key, param, versionstamp_pos) = match kind {
            MutationType::SetVersionstampedKey => {
                let transform = prepare_versionstamped(key, StampTarget::Key, self.convention)?;
                let pos = transform.pos();
                (transform.payload().clone(), Bytes::copy_from_slice(param), Some(pos))
            }
            MutationType::SetVersionstampedValue => {
                let transform = prepare_versionstamped(param, StampTarget::Value, self.convention)?;
                let pos = transform.pos();
                (Bytes::copy_from_slice(key), transform.payload().clone(), Some(pos))
            }
            _ => (Bytes::copy_from_slice(key), Bytes::copy_from_slice(param), None),
        };

        if key.len() > self.max_key_size {
            return Err(WireError::InvalidMutationParameter {
                kind,
                reason: format!("key of {} bytes exceeds limit of {}", key.len(), self.max_key_size),
            });
        }

        if param.len() > self.max_value_size {
            return Err(WireError::InvalidMutationParameter {
                kind,
                reason: format!(
                    "parameter of {} bytes exceeds limit of {}",
                    param.len(),
                    self.max_value_size
                ),
            });
        }

        tracing::debug!(
            kind = %kind,
            opcode = kind.opcode(),
            key_len = key.len(),
            param_len = param.len(),
            "Encoded atomic op"
        );

        Ok(AtomicOp {
            kind,
            key,
            param,
            versionstamp_pos,
        })
    }

    /// Encode an atomic operation addressed by name or legacy alias
    ///
    /// Aliases produce output identical to their canonical kind.
    pub fn encode_named(&self, name: &str, key: &[u8], param: &[u8]) -> Result<AtomicOp> {
        let (kind, deprecated) = MutationType::resolve(name)?;
        if deprecated && self.warn_on_deprecated {
            tracing::warn!(alias = name, canonical = %kind, "Mutation alias is deprecated");
        }
        self.encode(kind, key, param)
    }
}
