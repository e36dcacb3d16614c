//! Conversion configuration.
//!
//! [`ConvertConfig`] is a plain struct with no CLI framework dependencies, so
//! library users can build it directly or load it with `serde`.
//!
//! # Example
//!
//! ```rust
//! use threadpack::config::ConvertConfig;
//! use threadpack::core::output::QuoteMode;
//! use threadpack::parsing::TimezonePolicy;
//!
//! let config = ConvertConfig::new()
//!     .with_timezone(TimezonePolicy::SourceOffset)
//!     .with_quoting(QuoteMode::Minimal);
//!
//! assert_eq!(config.timezone, TimezonePolicy::SourceOffset);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::output::QuoteMode;
use crate::parsing::TimezonePolicy;

/// Settings for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// How naive timestamps become epoch seconds (default: host local time)
    pub timezone: TimezonePolicy,

    /// How output fields are quoted (default: escaped)
    pub quoting: QuoteMode,

    /// Read/write buffer size in bytes (default: 64KB)
    pub buffer_size: usize,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            timezone: TimezonePolicy::default(),
            quoting: QuoteMode::default(),
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

impl ConvertConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte-for-byte reproduction of the historical converter:
    /// host local time and unescaped quote wrapping.
    pub fn legacy() -> Self {
        Self {
            timezone: TimezonePolicy::Local,
            quoting: QuoteMode::Legacy,
            ..Self::default()
        }
    }

    /// Sets the timezone policy.
    #[must_use]
    pub fn with_timezone(mut self, timezone: TimezonePolicy) -> Self {
        self.timezone = timezone;
        self
    }

    /// Sets the quoting mode.
    #[must_use]
    pub fn with_quoting(mut self, quoting: QuoteMode) -> Self {
        self.quoting = quoting;
        self
    }

    /// Sets the I/O buffer size. Zero is bumped to one byte.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }
}
