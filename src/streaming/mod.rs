//! Streaming input for thread exports.
//!
//! Records are pulled one at a time from a buffered reader, so memory use is
//! constant regardless of export size.
//!
//! # Example
//!
//! ```rust,no_run
//! use threadpack::streaming::RecordReader;
//!
//! let reader = RecordReader::from_path("initial_output.csv", 64 * 1024)?;
//! for item in reader {
//!     let (line, record) = item?;
//!     println!("{line}: {} -> {}", record.sender, record.text);
//! }
//! # Ok::<(), threadpack::ThreadpackError>(())
//! ```

mod reader;

pub use reader::RecordReader;
