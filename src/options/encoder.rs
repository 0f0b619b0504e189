//! Option encoder
//!
//! Turns a typed `(option, parameter)` pair into the `(code, bytes)` pair the
//! engine consumes.

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::{Result, WireError};

use super::{OptionId, OptionParam, Scope};

/// An option ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOption {
    pub scope: Scope,
    pub code: u32,
    /// `None` for options that take no parameter
    pub payload: Option<Bytes>,
}

impl EncodedOption {
    /// Payload as a slice (empty when absent)
    pub fn payload_bytes(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }
}

/// Encodes options, optionally warning on deprecated ones
#[derive(Debug, Clone)]
pub struct OptionEncoder {
    warn_on_deprecated: bool,
}

impl Default for OptionEncoder {
    fn default() -> Self {
        Self {
            warn_on_deprecated: true,
        }
    }
}

impl OptionEncoder {
    /// Create an encoder honouring the config's deprecation setting
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            warn_on_deprecated: config.warn_on_deprecated,
        }
    }

    /// Encode an option and its parameter
    ///
    /// The parameter kind must match the declared kind exactly. Deprecated
    /// options encode normally.
    pub fn encode(&self, option: impl Into<OptionId>, param: OptionParam) -> Result<EncodedOption> {
        let option = option.into();
        let descriptor = option.descriptor();

        if param.kind() != descriptor.kind {
            return Err(WireError::InvalidParameterType {
                scope: descriptor.scope,
                option: descriptor.name,
                expected: descriptor.kind,
                actual: param.kind(),
            });
        }

        if descriptor.deprecated && self.warn_on_deprecated {
            tracing::warn!(
                scope = %descriptor.scope,
                option = descriptor.name,
                "Option is deprecated"
            );
        }

        let payload = match param {
            OptionParam::None => None,
            OptionParam::Int(v) => Some(Bytes::copy_from_slice(&v.to_le_bytes())),
            OptionParam::Bytes(b) => Some(b),
            OptionParam::String(s) => Some(Bytes::from(s.into_bytes())),
        };

        tracing::debug!(
            scope = %descriptor.scope,
            option = descriptor.name,
            code = descriptor.code,
            len = payload.as_ref().map_or(0, |p| p.len()),
            "Encoded option"
        );

        Ok(EncodedOption {
            scope: descriptor.scope,
            code: descriptor.code,
            payload,
        })
    }

    /// Encode an option addressed by `(scope, symbolic name)`
    pub fn encode_by_name(&self, scope: Scope, name: &str, param: OptionParam) -> Result<EncodedOption> {
        let option = OptionId::lookup(scope, name)?;
        self.encode(option, param)
    }
}

/// Encode with the default encoder
pub fn encode(option: impl Into<OptionId>, param: OptionParam) -> Result<EncodedOption> {
    OptionEncoder::default().encode(option, param)
}

/// Encode by name with the default encoder
pub fn encode_by_name(scope: Scope, name: &str, param: OptionParam) -> Result<EncodedOption> {
    OptionEncoder::default().encode_by_name(scope, name, param)
}
