//! Core conversion logic for threadpack.
//!
//! This module contains:
//! - [`processor`] - The record transformer and the streaming pipeline
//! - [`output`] - Header passthrough and record serialization
//!
//! # Quick Start
//!
//! ```rust
//! use threadpack::core::{ConvertConfig, convert_str};
//! use threadpack::parsing::TimezonePolicy;
//!
//! let input = "thread,names,sender,time,text\n\
//!              T1,Alice,Alice,\"Saturday, 16 May 2015 at 17:07 UTC+03\",Hi\n";
//! let config = ConvertConfig::new().with_timezone(TimezonePolicy::Utc);
//!
//! let output = convert_str(input, &config)?;
//! assert!(output.ends_with("False,\"T1\",\"Alice\",Alice,1431796020,\"Hi\"\n"));
//! # Ok::<(), threadpack::ThreadpackError>(())
//! ```

pub mod output;
pub mod processor;

// Re-export main types for convenience
pub use crate::config::ConvertConfig;
pub use output::{QuoteMode, RecordWriter, format_header, serialize_record};
pub use processor::{ProcessingStats, convert, convert_file, convert_str, transform_record};
