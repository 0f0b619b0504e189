//! Error types for AtlasWire
//!
//! Provides a unified error type for all operations.
//!
//! Two families live here:
//! - local validation errors, raised before anything reaches the engine
//! - engine-reported errors, carried as [`EngineError`] with their
//!   retry classification attached

use thiserror::Error;

use crate::classify::EngineError;
use crate::mutation::MutationType;
use crate::options::{ParamKind, Scope};

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Unified error type for AtlasWire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Option Errors
    // -------------------------------------------------------------------------
    #[error("Invalid parameter type for {scope} option '{option}': expected {expected}, got {actual}")]
    InvalidParameterType {
        scope: Scope,
        option: &'static str,
        expected: ParamKind,
        actual: ParamKind,
    },

    #[error("Unknown {scope} option: {name}")]
    UnknownOption { scope: Scope, name: String },

    #[error("Unknown option scope: {0}")]
    UnknownScope(String),

    // -------------------------------------------------------------------------
    // Mutation Errors
    // -------------------------------------------------------------------------
    #[error("Invalid parameter for {kind:?} mutation: {reason}")]
    InvalidMutationParameter { kind: MutationType, reason: String },

    #[error("Unknown mutation type: {0}")]
    UnknownMutation(String),

    #[error("{0:?} is resolved by the engine at commit time and cannot be evaluated locally")]
    CommitTimeOnly(MutationType),

    // -------------------------------------------------------------------------
    // Versionstamp Errors
    // -------------------------------------------------------------------------
    #[error("Versionstamp offset out of range: pos {pos} + 10 exceeds payload length {payload_len}")]
    VersionstampOffsetOutOfRange { pos: u32, payload_len: usize },

    // -------------------------------------------------------------------------
    // Range / Streaming Errors
    // -------------------------------------------------------------------------
    #[error("Invalid conflict range: begin sorts after end")]
    InvalidConflictRange,

    #[error("Invalid range read: {0}")]
    InvalidRange(String),

    #[error("Invalid streaming mode: {0}")]
    InvalidStreamingMode(String),

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Engine(#[from] EngineError),

    // -------------------------------------------------------------------------
    // Boundary Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// True for errors detected locally before any engine round trip
    pub fn is_local(&self) -> bool {
        !matches!(self, WireError::Engine(_) | WireError::Io(_))
    }

    /// The engine error, if this error came back from the engine
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            WireError::Engine(e) => Some(e),
            _ => None,
        }
    }
}
