//! # Threadpack
//!
//! A Rust library for normalizing Messenger-style thread exports into CSV
//! that is ready for downstream analysis.
//!
//! ## Overview
//!
//! The input is a header line followed by CSV rows with five positional
//! fields: thread name, participants, sender, localized timestamp, text.
//! Each row becomes one output row that
//!
//! - gains a leading `groupchat` flag (`True` when the participants field
//!   lists more than one name),
//! - replaces `Saturday, 16 May 2015 at 17:07 UTC+03` with epoch seconds,
//! - keeps every other field verbatim.
//!
//! Conversion is a single forward pass with constant memory. The first
//! malformed row aborts the run with its line number attached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threadpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ConvertConfig::new().with_timezone(TimezonePolicy::SourceOffset);
//!     let stats = convert_file("initial_output.csv", "data.csv", &config)?;
//!     println!("{} records", stats.records);
//!     Ok(())
//! }
//! ```
//!
//! ## Timezones
//!
//! Export timestamps are wall-clock times. [`TimezonePolicy`](parsing::TimezonePolicy)
//! decides what instant they denote: the host's local time (the historical
//! default), UTC, or the `UTC±NN` offset printed in the string.
//!
//! ## Module Structure
//!
//! - [`core`] - The conversion pipeline
//!   - [`core::processor`] - [`convert`](core::convert), [`convert_file`](core::convert_file), [`ProcessingStats`](core::ProcessingStats)
//!   - [`core::output`] - header passthrough, [`QuoteMode`](core::QuoteMode), [`RecordWriter`](core::RecordWriter)
//! - [`parsing`] - localized timestamp parser
//! - [`record`] - [`RawRecord`](record::RawRecord), [`FormattedRecord`](record::FormattedRecord)
//! - [`streaming`] - [`RecordReader`](streaming::RecordReader)
//! - [`config`] - [`ConvertConfig`](config::ConvertConfig)
//! - [`cli`] - CLI types (requires the `cli` feature)
//! - [`error`] - [`ThreadpackError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod parsing;
pub mod record;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ThreadpackError};
pub use record::{FormattedRecord, RawRecord};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use threadpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, ThreadpackError};
    pub use crate::record::{FormattedRecord, RawRecord, is_group_chat};

    pub use crate::config::ConvertConfig;
    pub use crate::parsing::{TimezonePolicy, parse_epoch, parse_timestamp};

    pub use crate::core::output::{QuoteMode, RecordWriter, format_header, serialize_record};
    pub use crate::core::processor::{
        ProcessingStats, convert, convert_file, convert_str, transform_record,
    };

    pub use crate::streaming::RecordReader;
}
