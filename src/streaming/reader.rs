//! Lazy record source over a thread export.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use csv::StringRecord;

use crate::error::{RecordErrorKind, Result, ThreadpackError};
use crate::record::{RAW_FIELD_COUNT, RawRecord};

/// Reads the header line, then yields records one at a time.
///
/// The header is taken verbatim from the first physical line; everything
/// after it is parsed as comma-delimited CSV with `"` quoting, so fields may
/// contain commas, doubled quotes and line breaks.
///
/// Each item carries the 1-based input line the record starts on (the header
/// is line 1). A blank line is a record with no fields and fails like any
/// other short record. Iteration stops after the first error.
///
/// # Example
///
/// ```rust
/// use threadpack::streaming::RecordReader;
///
/// let input = "thread,names,sender,time,text\nT1,\"Alice,Bob\",Alice,t,Hi\n";
/// let mut reader = RecordReader::new(input.as_bytes())?;
/// assert_eq!(reader.header(), "thread,names,sender,time,text");
///
/// let (line, record) = reader.next().unwrap()?;
/// assert_eq!(line, 2);
/// assert_eq!(record.participants, "Alice,Bob");
/// # Ok::<(), threadpack::ThreadpackError>(())
/// ```
pub struct RecordReader<R: BufRead> {
    header: String,
    csv: csv::Reader<LineTracker<R>>,
    row: StringRecord,
    records_read: u64,
    finished: bool,
}

impl<R: BufRead> RecordReader<R> {
    /// Creates a reader with the default 64KB CSV buffer.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_capacity(64 * 1024, reader)
    }

    /// Creates a reader with a custom CSV buffer size.
    ///
    /// Consumes the header line immediately.
    pub fn with_capacity(capacity: usize, mut reader: R) -> Result<Self> {
        let mut header = String::new();
        reader.read_line(&mut header)?;

        let csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(b',')
            .quote(b'"')
            .buffer_capacity(capacity.max(1))
            .from_reader(LineTracker::new(reader, 2));

        Ok(Self {
            header: header.trim().to_string(),
            csv,
            row: StringRecord::new(),
            records_read: 0,
            finished: false,
        })
    }

    /// The input header line without its terminator.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Number of records yielded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    fn fail(&mut self, line: u64, content: String, kind: RecordErrorKind) -> ThreadpackError {
        self.finished = true;
        ThreadpackError::record(line, content, kind)
    }

    fn blank_line(&mut self, line: u64) -> ThreadpackError {
        self.fail(
            line,
            String::new(),
            RecordErrorKind::FieldCount {
                expected: RAW_FIELD_COUNT,
                actual: 0,
            },
        )
    }
}

impl RecordReader<BufReader<File>> {
    /// Opens a file for reading.
    pub fn from_path(path: impl AsRef<Path>, buffer_size: usize) -> Result<Self> {
        let file = File::open(path)?;
        Self::with_capacity(buffer_size, BufReader::with_capacity(buffer_size.max(1), file))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<(u64, RawRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let start = self.csv.position().byte();
        match self.csv.read_record(&mut self.row) {
            Ok(true) => {
                let end = self.csv.position().byte();
                let located = self.csv.get_mut().locate(start, end);
                let line = match located {
                    LineStart::Blank(line) => return Some(Err(self.blank_line(line))),
                    LineStart::Record(line) => line,
                    // a record always starts on a tracked line; keep the csv count as a fallback
                    LineStart::Unknown => self.row.position().map_or(0, csv::Position::line) + 1,
                };
                self.records_read += 1;

                match RawRecord::from_fields(&self.row) {
                    Ok(raw) => Some(Ok((line, raw))),
                    Err(kind) => {
                        let content = self.row.iter().collect::<Vec<_>>().join(",");
                        Some(Err(self.fail(line, content, kind)))
                    }
                }
            }
            Ok(false) => {
                self.finished = true;
                // trailing blank lines are only visible in the raw bytes
                let located = self.csv.get_mut().locate(start, u64::MAX);
                match located {
                    LineStart::Blank(line) => Some(Err(self.blank_line(line))),
                    LineStart::Record(_) | LineStart::Unknown => None,
                }
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err.into()))
            }
        }
    }
}

/// Where the first physical line of a byte span begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStart {
    /// A line holding nothing but its terminator.
    Blank(u64),
    /// A line with content.
    Record(u64),
    /// No line starts inside the span.
    Unknown,
}

#[derive(Debug, Clone, Copy)]
struct PhysicalLine {
    offset: u64,
    number: u64,
    blank: bool,
}

/// Pass-through reader that notes where each physical line starts.
///
/// The CSV parser skips blank lines and reports record positions from before
/// that skip, so line numbers are recovered from the raw bytes instead. Only
/// lines the parser has buffered but not yet consumed are kept.
struct LineTracker<R> {
    inner: R,
    offset: u64,
    next_number: u64,
    at_line_start: bool,
    lines: VecDeque<PhysicalLine>,
}

impl<R> LineTracker<R> {
    fn new(inner: R, first_line: u64) -> Self {
        Self {
            inner,
            offset: 0,
            next_number: first_line,
            at_line_start: true,
            lines: VecDeque::new(),
        }
    }

    fn observe(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.at_line_start {
                self.lines.push_back(PhysicalLine {
                    offset: self.offset,
                    number: self.next_number,
                    blank: true,
                });
                self.next_number += 1;
                self.at_line_start = false;
            }
            match byte {
                b'\n' => self.at_line_start = true,
                b'\r' => {}
                _ => {
                    if let Some(line) = self.lines.back_mut() {
                        line.blank = false;
                    }
                }
            }
            self.offset += 1;
        }
    }

    /// Classifies the first line starting in `start..end` and forgets every
    /// line starting before `end`.
    fn locate(&mut self, start: u64, end: u64) -> LineStart {
        while self.lines.front().is_some_and(|l| l.offset < start) {
            self.lines.pop_front();
        }

        let found = match self.lines.front() {
            Some(l) if l.offset < end && l.blank => LineStart::Blank(l.number),
            Some(l) if l.offset < end => LineStart::Record(l.number),
            _ => LineStart::Unknown,
        };

        while self.lines.front().is_some_and(|l| l.offset < end) {
            self.lines.pop_front();
        }
        found
    }
}

impl<R: Read> Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.observe(&buf[..n]);
        Ok(n)
    }
}
