//! Unified error types for threadpack.
//!
//! This module provides a single [`ThreadpackError`] enum that covers every
//! failure the conversion pipeline can hit. Malformed records are fatal: the
//! error carries the input line number and the offending content so the run
//! can be diagnosed without re-reading the file.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get the line and field that broke the run
//! - **Developers** get source error chains for debugging

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for threadpack operations.
///
/// # Example
///
/// ```rust
/// use threadpack::error::Result;
///
/// fn my_function() -> Result<u64> {
///     Ok(0)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ThreadpackError>;

/// The error type for all threadpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThreadpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The CSV reader or writer failed (unterminated quote, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record could not be transformed.
    ///
    /// Aborts the whole run at the offending record.
    #[error("Malformed record on line {line}: {source} (content: {content})")]
    Record {
        /// 1-based input line (the header is line 1)
        line: u64,
        /// The raw fields, comma-joined, as read from the input
        content: String,
        /// What was wrong with the record
        #[source]
        source: RecordErrorKind,
    },

    /// A standalone timestamp string could not be parsed.
    #[error("Invalid timestamp '{input}': {source}")]
    Timestamp {
        /// The string that was provided
        input: String,
        /// The underlying parse error
        #[source]
        source: TimestampError,
    },

    /// Serializer output was not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Kinds of malformed records.
#[derive(Debug, Error)]
pub enum RecordErrorKind {
    /// The record does not have the five positional fields.
    #[error("expected {expected} fields, found {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// The timestamp field could not be converted.
    #[error("timestamp: {0}")]
    Timestamp(#[from] TimestampError),
}

/// Reasons a localized timestamp fails to parse or convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// The string does not split into the expected token layout.
    #[error("expected 6 or 7 space-separated tokens, found {actual}")]
    TokenCount { actual: usize },

    /// The month token is not one of the twelve English month names.
    #[error("unknown month name '{0}'")]
    UnknownMonth(String),

    /// A numeric token (day, year, hour, minute) is not an integer.
    #[error("{field} is not a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// The numbers parse but do not form a calendar date-time.
    #[error("no such date-time: {year}-{month:02}-{day:02} {hour:02}:{minute:02}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    },

    /// The offset policy was requested but the string has no `UTC±NN` token.
    #[error("no UTC offset token to apply")]
    MissingOffset,

    /// The `UTC±NN` token is not a recognizable offset.
    #[error("invalid UTC offset '{0}'")]
    InvalidOffset(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ThreadpackError {
    /// Creates a malformed-record error.
    pub fn record(line: u64, content: impl Into<String>, source: RecordErrorKind) -> Self {
        ThreadpackError::Record {
            line,
            content: content.into(),
            source,
        }
    }

    /// Creates a standalone timestamp error.
    pub fn timestamp(input: impl Into<String>, source: TimestampError) -> Self {
        ThreadpackError::Timestamp {
            input: input.into(),
            source,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ThreadpackError::Io(_))
    }

    /// Returns `true` if this is a malformed-record error.
    pub fn is_record(&self) -> bool {
        matches!(self, ThreadpackError::Record { .. })
    }

    /// Returns `true` if this is a standalone timestamp error.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, ThreadpackError::Timestamp { .. })
    }

    /// Returns the input line of a malformed record, if any.
    pub fn line(&self) -> Option<u64> {
        match self {
            ThreadpackError::Record { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<std::string::FromUtf8Error> for ThreadpackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ThreadpackError::Utf8 {
            context: "record serialization".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
