//! Input and output row types.
//!
//! A [`RawRecord`] is one row of a thread export: five positional fields.
//! A [`FormattedRecord`] is the normalized row written to the output: the same
//! fields plus a derived group-chat flag, with the localized timestamp
//! replaced by epoch seconds.
//!
//! # Example
//!
//! ```
//! use threadpack::record::{FormattedRecord, RawRecord};
//! use threadpack::parsing::TimezonePolicy;
//!
//! let raw = RawRecord::new(
//!     "T1",
//!     "Alice,Bob",
//!     "Alice",
//!     "Saturday, 16 May 2015 at 17:07 UTC+03",
//!     "Hello",
//! );
//! let formatted = FormattedRecord::from_raw(raw, TimezonePolicy::Utc)?;
//!
//! assert!(formatted.is_group_chat);
//! assert_eq!(formatted.epoch_seconds, 1431796020);
//! # Ok::<(), threadpack::error::TimestampError>(())
//! ```

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{RecordErrorKind, TimestampError};
use crate::parsing::{TimezonePolicy, parse_timestamp};

/// Number of positional fields in an input row.
pub const RAW_FIELD_COUNT: usize = 5;

/// One input row: thread, participants, sender, localized time, text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Label of the conversation thread.
    pub thread_name: String,

    /// Comma-separated participant names, as a single CSV field.
    pub participants: String,

    /// Author of this message.
    pub sender: String,

    /// Localized time, e.g. `Saturday, 16 May 2015 at 17:07 UTC+03`.
    pub raw_timestamp: String,

    /// Message body. May contain commas, quotes and newlines.
    pub text: String,
}

impl RawRecord {
    /// Creates a record from its five fields.
    pub fn new(
        thread_name: impl Into<String>,
        participants: impl Into<String>,
        sender: impl Into<String>,
        raw_timestamp: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            thread_name: thread_name.into(),
            participants: participants.into(),
            sender: sender.into(),
            raw_timestamp: raw_timestamp.into(),
            text: text.into(),
        }
    }

    /// Extracts the positional fields of a CSV row.
    ///
    /// Rows with anything other than exactly five fields are rejected.
    pub fn from_fields(row: &StringRecord) -> Result<Self, RecordErrorKind> {
        if row.len() != RAW_FIELD_COUNT {
            return Err(RecordErrorKind::FieldCount {
                expected: RAW_FIELD_COUNT,
                actual: row.len(),
            });
        }

        Ok(Self::new(&row[0], &row[1], &row[2], &row[3], &row[4]))
    }

    /// The five fields joined with commas, for diagnostics.
    pub fn joined(&self) -> String {
        [
            self.thread_name.as_str(),
            self.participants.as_str(),
            self.sender.as_str(),
            self.raw_timestamp.as_str(),
            self.text.as_str(),
        ]
        .join(",")
    }
}

/// Returns `true` if the participants field names more than one person.
///
/// Participant lists are comma-joined, so any comma means a group thread.
pub fn is_group_chat(participants: &str) -> bool {
    participants.contains(',')
}

/// One output row, derived from exactly one [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedRecord {
    pub is_group_chat: bool,
    pub thread_name: String,
    pub participants: String,
    pub sender: String,
    pub epoch_seconds: i64,
    pub text: String,
}

impl FormattedRecord {
    /// Transforms a raw row. Consumes it so no field is copied twice.
    pub fn from_raw(raw: RawRecord, policy: TimezonePolicy) -> Result<Self, TimestampError> {
        let epoch_seconds = parse_timestamp(&raw.raw_timestamp)?.to_epoch(policy)?;
        Ok(Self::with_epoch(raw, epoch_seconds))
    }

    /// Builds the output row from a raw row whose timestamp is already converted.
    pub fn with_epoch(raw: RawRecord, epoch_seconds: i64) -> Self {
        Self {
            is_group_chat: is_group_chat(&raw.participants),
            thread_name: raw.thread_name,
            participants: raw.participants,
            sender: raw.sender,
            epoch_seconds,
            text: raw.text,
        }
    }
}
