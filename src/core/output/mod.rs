//! Output writers.
//!
//! - [`format_header`] - header passthrough with the `groupchat` column
//! - [`serialize_record`] - one [`FormattedRecord`](crate::record::FormattedRecord) to one CSV line
//! - [`RecordWriter`] - buffered line sink used by the pipeline
//!
//! # Example
//!
//! ```rust
//! use threadpack::core::output::{QuoteMode, RecordWriter};
//!
//! let mut writer = RecordWriter::new(Vec::new(), QuoteMode::Escaped);
//! writer.write_header("thread,names,sender,time,text")?;
//! let bytes = writer.into_inner()?;
//!
//! assert_eq!(bytes, b"groupchat,thread,names,sender,time,text\n");
//! # Ok::<(), threadpack::ThreadpackError>(())
//! ```

mod csv_writer;

pub use csv_writer::{
    GROUPCHAT_COLUMN, QuoteMode, RecordWriter, format_header, serialize_record,
};
