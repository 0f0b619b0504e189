//! Error Classification Module
//!
//! Maps engine error codes onto the retry facets a caller's retry loop
//! consults. This layer never retries anything itself.
//!
//! ## Facets
//! - `retryable`: the operation may be re-executed
//! - `maybe_committed`: the transaction may have committed; re-running a
//!   non-idempotent transaction can apply its effects twice
//! - `retryable_not_committed`: safe to retry, nothing was committed
//!
//! `retryable` is implied by either of the other two facets.
//!
//! Unknown codes classify as all-false. That is the conservative default:
//! an error nobody recognises is neither retried nor assumed committed.

use std::fmt;

/// Predicate selector codes understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorPredicate {
    Retryable = 50000,
    MaybeCommitted = 50001,
    RetryableNotCommitted = 50002,
}

impl ErrorPredicate {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Evaluate this predicate against an error code
    pub fn test(self, code: i32) -> bool {
        let c = classify(code);
        match self {
            ErrorPredicate::Retryable => c.retryable,
            ErrorPredicate::MaybeCommitted => c.maybe_committed,
            ErrorPredicate::RetryableNotCommitted => c.retryable_not_committed,
        }
    }
}

/// Retry facets of an error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ErrorClassification {
    pub retryable: bool,
    pub maybe_committed: bool,
    pub retryable_not_committed: bool,
}

impl ErrorClassification {
    const NONE: ErrorClassification = ErrorClassification {
        retryable: false,
        maybe_committed: false,
        retryable_not_committed: false,
    };

    fn from_facets(maybe_committed: bool, retryable_not_committed: bool) -> Self {
        Self {
            retryable: maybe_committed || retryable_not_committed,
            maybe_committed,
            retryable_not_committed,
        }
    }

    /// No facet is set
    pub fn is_fatal(&self) -> bool {
        *self == Self::NONE
    }
}

// =============================================================================
// Known Codes
// =============================================================================

/// Well-known engine error codes: (code, name, maybe_committed, retryable_not_committed)
const KNOWN_CODES: &[(i32, &str, bool, bool)] = &[
    (0, "success", false, false),
    (1007, "transaction_too_old", false, true),
    (1009, "future_version", false, true),
    (1020, "not_committed", false, true),
    (1021, "commit_unknown_result", true, false),
    (1025, "transaction_cancelled", false, false),
    (1031, "transaction_timed_out", false, false),
    (1037, "process_behind", false, true),
    (1038, "database_locked", false, true),
    (1039, "cluster_version_changed", true, false),
    (1042, "proxy_memory_limit_exceeded", false, true),
    (1051, "batch_transaction_throttled", false, true),
    (1213, "tag_throttled", false, true),
    (2000, "client_invalid_operation", false, false),
    (2004, "key_outside_legal_range", false, false),
    (2005, "inverted_range", false, false),
    (2006, "invalid_option_value", false, false),
    (2007, "invalid_option", false, false),
    (2101, "transaction_too_large", false, false),
    (2102, "key_too_large", false, false),
    (2103, "value_too_large", false, false),
];

/// Classify an engine error code
///
/// Total over the 32-bit code space. The predicate selector codes classify
/// as the facet they name.
pub fn classify(code: i32) -> ErrorClassification {
    match code {
        50000 => ErrorClassification {
            retryable: true,
            ..ErrorClassification::NONE
        },
        50001 => ErrorClassification::from_facets(true, false),
        50002 => ErrorClassification::from_facets(false, true),
        _ => KNOWN_CODES
            .iter()
            .find(|(c, ..)| *c == code)
            .map(|&(_, _, maybe, not_committed)| ErrorClassification::from_facets(maybe, not_committed))
            .unwrap_or(ErrorClassification::NONE),
    }
}

/// Symbolic name of a known code
pub fn error_name(code: i32) -> Option<&'static str> {
    match code {
        50000 => Some("predicate_retryable"),
        50001 => Some("predicate_maybe_committed"),
        50002 => Some("predicate_retryable_not_committed"),
        _ => KNOWN_CODES.iter().find(|(c, ..)| *c == code).map(|(_, name, ..)| *name),
    }
}

// =============================================================================
// Engine Error
// =============================================================================

/// An error code returned by the engine, with its classification attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineError {
    pub code: i32,
    pub classification: ErrorClassification,
}

impl EngineError {
    pub fn new(code: i32) -> Self {
        Self {
            code,
            classification: classify(code),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.classification.retryable
    }

    pub fn is_maybe_committed(&self) -> bool {
        self.classification.maybe_committed
    }

    pub fn is_retryable_not_committed(&self) -> bool {
        self.classification.retryable_not_committed
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match error_name(self.code) {
            Some(name) => write!(f, "Engine error {} ({})", self.code, name),
            None => write!(f, "Engine error {}", self.code),
        }
    }
}

impl std::error::Error for EngineError {}
