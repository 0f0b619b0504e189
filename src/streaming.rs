//! Streaming modes for range reads
//!
//! Hints passed through to the engine as a plain integer. No client-side
//! batching logic lives here.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, WireError};

/// Range-read delivery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum StreamingMode {
    /// Transfer the whole range as early as possible
    WantAll = -1,
    /// Start small and grow batches as the caller keeps iterating
    #[default]
    Iterator = 0,
    /// Deliver exactly the requested row limit in one batch
    Exact = 1,
    Small = 2,
    Medium = 3,
    Large = 4,
    /// Batches large enough for a single client to get high bandwidth
    Serial = 5,
}

impl StreamingMode {
    pub const ALL: [StreamingMode; 7] = [
        StreamingMode::WantAll,
        StreamingMode::Iterator,
        StreamingMode::Exact,
        StreamingMode::Small,
        StreamingMode::Medium,
        StreamingMode::Large,
        StreamingMode::Serial,
    ];

    /// Wire value
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamingMode::WantAll => "want_all",
            StreamingMode::Iterator => "iterator",
            StreamingMode::Exact => "exact",
            StreamingMode::Small => "small",
            StreamingMode::Medium => "medium",
            StreamingMode::Large => "large",
            StreamingMode::Serial => "serial",
        }
    }
}

impl TryFrom<i32> for StreamingMode {
    type Error = WireError;

    fn try_from(value: i32) -> Result<Self> {
        StreamingMode::ALL
            .iter()
            .copied()
            .find(|m| m.value() == value)
            .ok_or_else(|| WireError::InvalidStreamingMode(value.to_string()))
    }
}

impl FromStr for StreamingMode {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.replace('-', "_");
        StreamingMode::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| WireError::InvalidStreamingMode(s.to_string()))
    }
}

impl fmt::Display for StreamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
