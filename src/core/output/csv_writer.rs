//! CSV output writer.

use std::io::{BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::FormattedRecord;

/// Column name prepended to the input header.
pub const GROUPCHAT_COLUMN: &str = "groupchat";

/// Quoting discipline for output rows.
///
/// # Format
/// Columns are always
/// `groupchat, thread_name, participants, sender, epoch_seconds, text`.
///
/// | Mode | thread / participants / text | sender | embedded `"` |
/// |------|------------------------------|--------|--------------|
/// | `Legacy` | always quoted | bare | written raw (not valid CSV) |
/// | `Escaped` | always quoted | quoted if needed | doubled |
/// | `Minimal` | quoted if needed | quoted if needed | doubled |
///
/// `Legacy` and `Escaped` produce identical bytes unless a field contains a
/// double quote, or the sender contains a comma, quote or line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    /// Wrap fields in quotes without escaping anything.
    Legacy,
    /// Same layout as `Legacy`, but valid RFC 4180.
    #[default]
    Escaped,
    /// Let the CSV writer quote only where required.
    Minimal,
}

impl std::fmt::Display for QuoteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteMode::Legacy => write!(f, "legacy"),
            QuoteMode::Escaped => write!(f, "escaped"),
            QuoteMode::Minimal => write!(f, "minimal"),
        }
    }
}

/// Builds the output header: `groupchat,` followed by the input header.
///
/// Surrounding whitespace and the line terminator are dropped; the rest is
/// copied untouched.
pub fn format_header(input_header: &str) -> String {
    format!("{GROUPCHAT_COLUMN},{}", input_header.trim())
}

/// Serializes one record to a single line, without the terminator.
pub fn serialize_record(record: &FormattedRecord, mode: QuoteMode) -> Result<String> {
    let flag = bool_token(record.is_group_chat);

    match mode {
        QuoteMode::Legacy => Ok(format!(
            "{flag},\"{}\",\"{}\",{},{},\"{}\"",
            record.thread_name,
            record.participants,
            record.sender,
            record.epoch_seconds,
            record.text
        )),
        QuoteMode::Escaped => Ok(format!(
            "{flag},{},{},{},{},{}",
            escape_field(&record.thread_name, csv::QuoteStyle::Always)?,
            escape_field(&record.participants, csv::QuoteStyle::Always)?,
            escape_field(&record.sender, csv::QuoteStyle::Necessary)?,
            record.epoch_seconds,
            escape_field(&record.text, csv::QuoteStyle::Always)?
        )),
        QuoteMode::Minimal => {
            let epoch = record.epoch_seconds.to_string();
            let mut writer = csv::WriterBuilder::new()
                .quote_style(csv::QuoteStyle::Necessary)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(Vec::with_capacity(128));

            writer.write_record([
                flag,
                record.thread_name.as_str(),
                record.participants.as_str(),
                record.sender.as_str(),
                epoch.as_str(),
                record.text.as_str(),
            ])?;

            let mut bytes = writer.into_inner().map_err(|e| e.into_error())?;
            if bytes.last() == Some(&b'\n') {
                bytes.pop();
            }
            Ok(String::from_utf8(bytes)?)
        }
    }
}

fn bool_token(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// One field through the csv escaper, without delimiter or terminator.
fn escape_field(field: &str, style: csv::QuoteStyle) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(style)
        .buffer_capacity(field.len() + 8)
        .from_writer(Vec::with_capacity(field.len() + 2));
    writer.write_field(field)?;

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Line-oriented sink for the header and formatted records.
///
/// Every line ends with a single `\n`. Output is buffered; call
/// [`flush`](RecordWriter::flush) or [`into_inner`](RecordWriter::into_inner)
/// to push it to the underlying writer.
pub struct RecordWriter<W: Write> {
    inner: BufWriter<W>,
    quoting: QuoteMode,
    lines_written: u64,
}

impl<W: Write> RecordWriter<W> {
    /// Creates a writer with the default 64KB buffer.
    pub fn new(writer: W, quoting: QuoteMode) -> Self {
        Self::with_capacity(64 * 1024, writer, quoting)
    }

    /// Creates a writer with a custom buffer size.
    pub fn with_capacity(capacity: usize, writer: W, quoting: QuoteMode) -> Self {
        Self {
            inner: BufWriter::with_capacity(capacity, writer),
            quoting,
            lines_written: 0,
        }
    }

    /// Writes the output header derived from the input header line.
    pub fn write_header(&mut self, input_header: &str) -> Result<()> {
        let line = format_header(input_header);
        self.write_line(&line)
    }

    /// Writes one formatted record.
    pub fn write_record(&mut self, record: &FormattedRecord) -> Result<()> {
        let line = serialize_record(record, self.quoting)?;
        self.write_line(&line)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of lines written so far, header included.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flushes buffered output to the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(thread: &str, participants: &str, sender: &str, text: &str) -> FormattedRecord {
        FormattedRecord {
            is_group_chat: participants.contains(','),
            thread_name: thread.to_string(),
            participants: participants.to_string(),
            sender: sender.to_string(),
            epoch_seconds: 1431796020,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_format_header() {
        assert_eq!(format_header("a,b,c"), "groupchat,a,b,c");
        assert_eq!(format_header("a,b,c\r\n"), "groupchat,a,b,c");
        assert_eq!(format_header(""), "groupchat,");
    }

    #[test]
    fn test_serialize_legacy() {
        let rec = record("T1", "Alice,Bob", "Alice", "Hello");
        assert_eq!(
            serialize_record(&rec, QuoteMode::Legacy).unwrap(),
            "True,\"T1\",\"Alice,Bob\",Alice,1431796020,\"Hello\""
        );
    }

    #[test]
    fn test_serialize_legacy_does_not_escape() {
        let rec = record("T1", "Alice", "Alice", "say \"hi\"");
        assert_eq!(
            serialize_record(&rec, QuoteMode::Legacy).unwrap(),
            "False,\"T1\",\"Alice\",Alice,1431796020,\"say \"hi\"\""
        );
    }

    #[test]
    fn test_serialize_escaped_matches_legacy_on_plain_input() {
        let rec = record("Team, A", "Alice,Bob", "Bob", "Hello, world");
        let legacy = serialize_record(&rec, QuoteMode::Legacy).unwrap();
        let escaped = serialize_record(&rec, QuoteMode::Escaped).unwrap();
        assert_eq!(legacy, escaped);
        assert!(escaped.contains("\"Team, A\""));
    }

    #[test]
    fn test_serialize_escaped_doubles_quotes() {
        let rec = record("T1", "Alice", "Al, \"the\" one", "say \"hi\"");
        assert_eq!(
            serialize_record(&rec, QuoteMode::Escaped).unwrap(),
            "False,\"T1\",\"Alice\",\"Al, \"\"the\"\" one\",1431796020,\"say \"\"hi\"\"\""
        );
    }

    #[test]
    fn test_serialize_minimal() {
        let rec = record("T1", "Alice,Bob", "Alice", "line1\nline2");
        assert_eq!(
            serialize_record(&rec, QuoteMode::Minimal).unwrap(),
            "True,T1,\"Alice,Bob\",Alice,1431796020,\"line1\nline2\""
        );
    }

    #[test]
    fn test_escaped_output_reads_back() {
        let rec = record("Team, \"A\"", "Alice,Bob", "Bob", "a,\"b\"\nc");
        let line = serialize_record(&rec, QuoteMode::Escaped).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Team, \"A\"");
        assert_eq!(&row[2], "Alice,Bob");
        assert_eq!(&row[5], "a,\"b\"\nc");
    }

    #[test]
    fn test_record_writer() {
        let mut writer = RecordWriter::new(Vec::new(), QuoteMode::Escaped);
        writer.write_header("thread,names,sender,time,text").unwrap();
        writer
            .write_record(&record("T1", "Alice", "Alice", "Hello"))
            .unwrap();
        assert_eq!(writer.lines_written(), 2);

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "groupchat,thread,names,sender,time,text\n\
             False,\"T1\",\"Alice\",Alice,1431796020,\"Hello\"\n"
        );
    }

    #[test]
    fn test_quote_mode_serde() {
        let json = serde_json::to_string(&QuoteMode::Minimal).unwrap();
        assert_eq!(json, "\"minimal\"");
        assert_eq!(QuoteMode::Legacy.to_string(), "legacy");
    }

    #[test]
    fn test_escape_field() {
        use csv::QuoteStyle::{Always, Necessary};

        assert_eq!(escape_field("plain", Always).unwrap(), "\"plain\"");
        assert_eq!(escape_field("", Always).unwrap(), "\"\"");
        assert_eq!(escape_field("a \"b\"", Always).unwrap(), "\"a \"\"b\"\"\"");

        assert_eq!(escape_field("Alice", Necessary).unwrap(), "Alice");
        assert_eq!(escape_field("", Necessary).unwrap(), "");
        assert_eq!(escape_field("Doe, Jane", Necessary).unwrap(), "\"Doe, Jane\"");
        assert_eq!(escape_field("two\nlines", Necessary).unwrap(), "\"two\nlines\"");
    }

    #[test]
    fn test_serialize_escaped_empty_sender_unquoted() {
        let line = serialize_record(&record("T1", "Alice", "", "x"), QuoteMode::Escaped).unwrap();
        assert_eq!(line, "False,\"T1\",\"Alice\",,1431796020,\"x\"");
    }
}
