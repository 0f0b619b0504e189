//! Reply definitions
//!
//! Inbound results from the engine. Errors carry only a numeric code.

use bytes::Bytes;

use crate::classify::EngineError;
use crate::error::Result;

/// Reply status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    Error = 0x01,
}

/// A reply from the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Success with optional payload (range read results)
    Ok(Option<Bytes>),

    /// Failure with the engine's error code
    Error(i32),
}

impl Reply {
    pub fn status(&self) -> Status {
        match self {
            Reply::Ok(_) => Status::Ok,
            Reply::Error(_) => Status::Error,
        }
    }

    /// Convert into a result, classifying any error code
    pub fn into_result(self) -> Result<Option<Bytes>> {
        match self {
            Reply::Ok(payload) => Ok(payload),
            Reply::Error(code) => Err(EngineError::new(code).into()),
        }
    }
}
