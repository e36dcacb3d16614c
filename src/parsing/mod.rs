//! Field-level parsing shared by the reader and the transformer.
//!
//! - [`timestamp`] - localized export timestamps to epoch seconds

pub mod timestamp;

pub use timestamp::{
    MONTHS, ParsedTimestamp, TimezonePolicy, local_epoch, month_from_name, parse_epoch,
    parse_timestamp, parse_utc_offset,
};
