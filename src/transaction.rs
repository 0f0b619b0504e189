//! Transaction Module
//!
//! Single-owner transaction handle that turns typed calls into encoded
//! engine requests.
//!
//! ## Responsibilities
//! - Encode options and atomic mutations, queueing them in call order
//! - Own the transaction's conflict range tracker
//! - Ship everything to the engine on commit
//! - Classify engine errors for the caller's retry loop
//!
//! Nothing here retries, sleeps or performs backoff.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::classify::ErrorClassification;
use crate::config::ClientConfig;
use crate::conflict::{ConflictRangeTracker, ConflictRangeType};
use crate::error::{Result, WireError};
use crate::mutation::{MutationEncoder, MutationType};
use crate::options::{OptionEncoder, OptionParam, TransactionOption};
use crate::protocol::{check_request_size, read_reply, write_request, Reply, Request};
use crate::streaming::StreamingMode;

// =============================================================================
// Engine Link
// =============================================================================

/// Transport to the engine
///
/// Implementations deliver one encoded request and return the engine's
/// reply. Framing, connection handling and cluster discovery live behind
/// this trait.
pub trait EngineLink {
    fn send(&mut self, request: Request) -> Result<Reply>;
}

/// Link over any byte stream using the framed protocol
pub struct StreamLink<S> {
    stream: S,
}

impl<S: Read + Write> StreamLink<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Read + Write> EngineLink for StreamLink<S> {
    fn send(&mut self, request: Request) -> Result<Reply> {
        write_request(&mut self.stream, &request)?;
        read_reply(&mut self.stream)
    }
}

// =============================================================================
// Range Reads
// =============================================================================

/// Options for a range read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOptions {
    /// Row limit (0 for unlimited)
    pub limit: i32,
    pub mode: StreamingMode,
    pub snapshot: bool,
    pub reverse: bool,
}

impl Default for RangeOptions {
    fn default() -> Self {
        Self {
            limit: 0,
            mode: StreamingMode::Iterator,
            snapshot: false,
            reverse: false,
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A transaction under construction
///
/// Must not be shared between threads without external synchronization;
/// every mutating call takes `&mut self`.
pub struct Transaction {
    options: OptionEncoder,
    mutations: MutationEncoder,
    max_key_size: usize,

    /// Encoded options and mutations, in call order
    pending: Vec<Request>,

    /// Explicit conflict ranges
    conflicts: ConflictRangeTracker,
}

impl Transaction {
    /// Create an empty transaction
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            options: OptionEncoder::new(config),
            mutations: MutationEncoder::new(config),
            max_key_size: config.max_key_size,
            pending: Vec::new(),
            conflicts: ConflictRangeTracker::new(),
        }
    }

    /// Set a transaction option
    ///
    /// `NextWriteNoWriteConflictRange` is forwarded as plain option bytes;
    /// the engine applies it to the next write.
    pub fn set_option(&mut self, option: TransactionOption, param: impl Into<OptionParam>) -> Result<()> {
        let encoded = self.options.encode(option, param.into())?;
        self.queue(encoded.into())
    }

    /// Queue an atomic mutation
    pub fn atomic_op(&mut self, kind: MutationType, key: &[u8], param: &[u8]) -> Result<()> {
        let op = self.mutations.encode(kind, key, param)?;
        self.queue(op.into())
    }

    /// Queue an atomic mutation by name or legacy alias
    pub fn atomic_op_named(&mut self, name: &str, key: &[u8], param: &[u8]) -> Result<()> {
        let op = self.mutations.encode_named(name, key, param)?;
        self.queue(op.into())
    }

    pub fn add(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::Add, key, param)
    }

    pub fn bit_and(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::BitAnd, key, param)
    }

    pub fn bit_or(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::BitOr, key, param)
    }

    pub fn bit_xor(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::BitXor, key, param)
    }

    /// Append if the result fits. An overflow is dropped by the engine at
    /// commit time without any error.
    pub fn append_if_fits(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::AppendIfFits, key, param)
    }

    pub fn max(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::Max, key, param)
    }

    pub fn min(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::Min, key, param)
    }

    pub fn byte_min(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::ByteMin, key, param)
    }

    pub fn byte_max(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::ByteMax, key, param)
    }

    pub fn compare_and_clear(&mut self, key: &[u8], param: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::CompareAndClear, key, param)
    }

    /// `key` carries the offset suffix
    pub fn set_versionstamped_key(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::SetVersionstampedKey, key, value)
    }

    /// `value` carries the offset suffix
    pub fn set_versionstamped_value(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.atomic_op(MutationType::SetVersionstampedValue, key, value)
    }

    /// Register an explicit conflict range
    pub fn add_conflict_range(&mut self, begin: &[u8], end: &[u8], kind: ConflictRangeType) -> Result<()> {
        self.conflicts.add_range(begin, end, kind)
    }

    /// Register an explicit single-key conflict range
    pub fn add_conflict_key(&mut self, key: &[u8], kind: ConflictRangeType) {
        self.conflicts.add_key(key, kind);
    }

    /// Read `[begin, end)` immediately
    ///
    /// Inverted bounds and keys over the configured size limit are rejected
    /// before anything is sent.
    pub fn get_range<L: EngineLink>(
        &mut self,
        link: &mut L,
        begin: &[u8],
        end: &[u8],
        options: RangeOptions,
    ) -> Result<Option<Bytes>> {
        if begin > end {
            return Err(WireError::InvalidRange("begin sorts after end".to_string()));
        }
        if let Some(key) = [begin, end].into_iter().find(|k| k.len() > self.max_key_size) {
            return Err(WireError::InvalidRange(format!(
                "key of {} bytes exceeds limit of {}",
                key.len(),
                self.max_key_size
            )));
        }

        let request = Request::RangeRead {
            begin: Bytes::copy_from_slice(begin),
            end: Bytes::copy_from_slice(end),
            limit: options.limit,
            mode: options.mode,
            snapshot: options.snapshot,
            reverse: options.reverse,
        };
        link.send(request)?.into_result()
    }

    /// Send queued requests, then conflict ranges, then the commit
    ///
    /// Stops at the first error reply and returns it classified. On error
    /// the transaction keeps its state; call [`Transaction::reset`] before
    /// retrying.
    pub fn commit<L: EngineLink>(&mut self, link: &mut L) -> Result<()> {
        tracing::debug!(
            requests = self.pending.len(),
            conflict_ranges = self.conflicts.len(),
            "Committing transaction"
        );

        let requests: Vec<Request> = self
            .pending
            .iter()
            .cloned()
            .chain(self.conflicts.ranges().iter().cloned().map(Request::from))
            .chain(std::iter::once(Request::Commit))
            .collect();

        for request in requests {
            if let Err(e) = link.send(request)?.into_result() {
                if let Some(engine) = e.engine_error() {
                    tracing::debug!(
                        code = engine.code,
                        retryable = engine.is_retryable(),
                        maybe_committed = engine.is_maybe_committed(),
                        "Commit failed"
                    );
                }
                return Err(e);
            }
        }

        self.reset();
        Ok(())
    }

    /// Classification for a failed call
    ///
    /// Local validation errors return `None`; they are never retryable.
    pub fn on_error(&self, error: &WireError) -> Option<ErrorClassification> {
        error.engine_error().map(|e| e.classification)
    }

    fn queue(&mut self, request: Request) -> Result<()> {
        check_request_size(&request)?;
        self.pending.push(request);
        Ok(())
    }

    /// Drop queued requests and conflict ranges
    pub fn reset(&mut self) {
        self.pending.clear();
        self.conflicts.clear();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Queued option and mutation requests
    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    /// Explicit conflict ranges
    pub fn conflict_ranges(&self) -> &ConflictRangeTracker {
        &self.conflicts
    }
}
