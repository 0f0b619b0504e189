//! # AtlasWire
//!
//! Client-side encoding layer for a transactional key-value store:
//! - Option encoding into the engine's binary wire format
//! - Atomic mutation opcodes and their byte-level combination rules
//! - Versionstamp offset transforms for keys and values
//! - Conflict range tracking for optimistic concurrency control
//! - Classification of engine error codes for retry loops
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Caller / Retry Loop                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ typed setters / mutators
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Transaction                            │
//! │        (single owner, queues encoded requests)               │
//! └───┬──────────────┬──────────────┬──────────────┬────────────┘
//!     │              │              │              │
//!     ▼              ▼              ▼              ▼
//! ┌────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐
//! │Options │   │ Mutation │   │Versionstamp│  │ Conflict │
//! │Encoder │   │  Codec   │──▶│ Transform  │  │ Tracker  │
//! └────────┘   └──────────┘   └───────────┘   └──────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Protocol (engine boundary)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ error code
//!                       ▼
//!               ┌──────────────┐
//!               │  Classifier  │
//!               └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod options;
pub mod mutation;
pub mod versionstamp;
pub mod conflict;
pub mod streaming;
pub mod classify;
pub mod protocol;
pub mod transaction;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::ClientConfig;
pub use classify::{classify, EngineError, ErrorClassification, ErrorPredicate};
pub use conflict::{ConflictRange, ConflictRangeTracker, ConflictRangeType};
pub use mutation::{apply_mutation, AtomicOp, MutationEncoder, MutationOutcome, MutationType};
pub use options::{
    DatabaseOption, EncodedOption, NetworkOption, OptionEncoder, OptionId, OptionParam, ParamKind,
    Scope, TransactionOption,
};
pub use streaming::StreamingMode;
pub use transaction::{EngineLink, RangeOptions, StreamLink, Transaction};
pub use versionstamp::{prepare_versionstamped, OffsetConvention, StampTarget, Versionstamp};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasWire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
