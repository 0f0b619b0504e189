//! Options Module
//!
//! Typed configuration knobs and their binary wire form.
//!
//! ## Responsibilities
//! - Enumerate every option per scope with its stable wire code
//! - Declare the parameter kind each option accepts
//! - Encode a `(option, parameter)` pair into `(code, bytes)`
//!
//! ## Parameter Encoding
//! ```text
//! None    → absent payload
//! Int64   → 8 bytes, little-endian two's complement
//! Bytes   → raw bytes, no length prefix
//! String  → raw UTF-8 bytes, no length prefix
//! ```
//!
//! Framing of the payload is left to the transport.

mod encoder;
mod table;

use std::fmt;

use bytes::Bytes;

pub use encoder::{encode, encode_by_name, EncodedOption, OptionEncoder};
pub use table::{DatabaseOption, NetworkOption, TransactionOption};

use crate::error::{Result, WireError};

// =============================================================================
// Scope / Parameter Kind
// =============================================================================

/// The object an option configures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Network,
    Database,
    Transaction,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Network => "network",
            Scope::Database => "database",
            Scope::Transaction => "transaction",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Scope {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "network" | "net" => Ok(Scope::Network),
            "database" | "db" => Ok(Scope::Database),
            "transaction" | "tr" | "txn" => Ok(Scope::Transaction),
            other => Err(WireError::UnknownScope(other.to_string())),
        }
    }
}

/// Shape of the parameter an option takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    None,
    Int64,
    Bytes,
    String,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::None => "no parameter",
            ParamKind::Int64 => "int64",
            ParamKind::Bytes => "bytes",
            ParamKind::String => "string",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// Static description of one option
///
/// Codes are unique within a scope and never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub scope: Scope,
    /// Symbolic snake_case name
    pub name: &'static str,
    /// Wire code
    pub code: u32,
    pub kind: ParamKind,
    /// Advisory only; deprecated options still encode
    pub deprecated: bool,
    pub description: &'static str,
}

/// Any option from any scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionId {
    Network(NetworkOption),
    Database(DatabaseOption),
    Transaction(TransactionOption),
}

impl OptionId {
    /// Get the option's descriptor
    pub fn descriptor(self) -> &'static OptionDescriptor {
        match self {
            OptionId::Network(o) => o.descriptor(),
            OptionId::Database(o) => o.descriptor(),
            OptionId::Transaction(o) => o.descriptor(),
        }
    }

    /// Get the owning scope
    pub fn scope(self) -> Scope {
        match self {
            OptionId::Network(_) => Scope::Network,
            OptionId::Database(_) => Scope::Database,
            OptionId::Transaction(_) => Scope::Transaction,
        }
    }

    /// Resolve a symbolic option name within a scope
    pub fn lookup(scope: Scope, name: &str) -> Result<Self> {
        let found = match scope {
            Scope::Network => NetworkOption::from_name(name).map(OptionId::Network),
            Scope::Database => DatabaseOption::from_name(name).map(OptionId::Database),
            Scope::Transaction => TransactionOption::from_name(name).map(OptionId::Transaction),
        };

        found.ok_or_else(|| WireError::UnknownOption {
            scope,
            name: name.to_string(),
        })
    }

    /// Every option in a scope, in table order
    pub fn all(scope: Scope) -> Vec<OptionId> {
        match scope {
            Scope::Network => NetworkOption::ALL.iter().copied().map(OptionId::Network).collect(),
            Scope::Database => DatabaseOption::ALL.iter().copied().map(OptionId::Database).collect(),
            Scope::Transaction => TransactionOption::ALL
                .iter()
                .copied()
                .map(OptionId::Transaction)
                .collect(),
        }
    }
}

impl From<NetworkOption> for OptionId {
    fn from(o: NetworkOption) -> Self {
        OptionId::Network(o)
    }
}

impl From<DatabaseOption> for OptionId {
    fn from(o: DatabaseOption) -> Self {
        OptionId::Database(o)
    }
}

impl From<TransactionOption> for OptionId {
    fn from(o: TransactionOption) -> Self {
        OptionId::Transaction(o)
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// A typed option parameter supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionParam {
    None,
    Int(i64),
    Bytes(Bytes),
    String(String),
}

impl OptionParam {
    /// The kind of this parameter
    pub fn kind(&self) -> ParamKind {
        match self {
            OptionParam::None => ParamKind::None,
            OptionParam::Int(_) => ParamKind::Int64,
            OptionParam::Bytes(_) => ParamKind::Bytes,
            OptionParam::String(_) => ParamKind::String,
        }
    }

    /// Wrap a byte slice
    pub fn bytes(b: impl AsRef<[u8]>) -> Self {
        OptionParam::Bytes(Bytes::copy_from_slice(b.as_ref()))
    }
}

impl From<i64> for OptionParam {
    fn from(v: i64) -> Self {
        OptionParam::Int(v)
    }
}

impl From<&str> for OptionParam {
    fn from(s: &str) -> Self {
        OptionParam::String(s.to_string())
    }
}

impl From<String> for OptionParam {
    fn from(s: String) -> Self {
        OptionParam::String(s)
    }
}

impl From<Vec<u8>> for OptionParam {
    fn from(b: Vec<u8>) -> Self {
        OptionParam::Bytes(Bytes::from(b))
    }
}

impl From<()> for OptionParam {
    fn from(_: ()) -> Self {
        OptionParam::None
    }
}
