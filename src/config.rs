//! Configuration for AtlasWire
//!
//! Centralized client-side configuration with sensible defaults.

use crate::versionstamp::OffsetConvention;

/// Main configuration for the encoding layer
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Negotiated API version. Gates the versionstamp offset convention:
    /// versions below 520 use the legacy layout.
    pub api_version: u32,

    // -------------------------------------------------------------------------
    // Size Limits
    // -------------------------------------------------------------------------
    /// Largest key the engine accepts (in bytes)
    pub max_key_size: usize,

    /// Largest value the engine accepts (in bytes). Also the bound used by
    /// the reference evaluator for `AppendIfFits`.
    pub max_value_size: usize,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Emit a warning when a deprecated option or mutation alias is encoded
    pub warn_on_deprecated: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_version: Self::DEFAULT_API_VERSION,
            max_key_size: 10_000,
            max_value_size: 100_000,
            warn_on_deprecated: true,
        }
    }
}

impl ClientConfig {
    /// API version assumed when none is negotiated
    pub const DEFAULT_API_VERSION: u32 = 610;

    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Versionstamp offset convention for the configured API version
    pub fn offset_convention(&self) -> OffsetConvention {
        OffsetConvention::for_api_version(self.api_version)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the negotiated API version
    pub fn api_version(mut self, version: u32) -> Self {
        self.config.api_version = version;
        self
    }

    /// Set the maximum key size (in bytes)
    pub fn max_key_size(mut self, size: usize) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the maximum value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Enable or disable deprecation warnings
    pub fn warn_on_deprecated(mut self, enabled: bool) -> Self {
        self.config.warn_on_deprecated = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
