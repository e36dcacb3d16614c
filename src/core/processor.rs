use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, info, trace, warn};

use super::output::RecordWriter;
use crate::config::ConvertConfig;
use crate::error::{Result, ThreadpackError};
use crate::parsing::parse_timestamp;
use crate::record::{FormattedRecord, RawRecord};
use crate::streaming::RecordReader;

/// Transforms one raw row into its output row.
///
/// `line` is only used to label the error if the timestamp is malformed.
pub fn transform_record(
    line: u64,
    raw: RawRecord,
    config: &ConvertConfig,
) -> Result<FormattedRecord> {
    let epoch = parse_timestamp(&raw.raw_timestamp)
        .and_then(|ts| ts.to_epoch(config.timezone))
        .map_err(|source| ThreadpackError::record(line, raw.joined(), source.into()))?;

    Ok(FormattedRecord::with_epoch(raw, epoch))
}

/// Counters for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub records: u64,
    pub group_chats: u64,
    pub direct_chats: u64,
}

impl ProcessingStats {
    fn count(&mut self, record: &FormattedRecord) {
        self.records += 1;
        if record.is_group_chat {
            self.group_chats += 1;
        } else {
            self.direct_chats += 1;
        }
    }

    /// Output lines produced, header included.
    pub fn lines_written(&self) -> u64 {
        self.records + 1
    }

    /// Share of records from group threads, in percent.
    pub fn group_ratio(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        self.group_chats as f64 / self.records as f64 * 100.0
    }
}

/// Converts a whole export from `input` to `output`.
///
/// The header goes out first, then one line per record in input order. The
/// first malformed record aborts the run; whatever was written before it is
/// flushed to `output` before the error is returned.
pub fn convert<R: Read, W: Write>(
    input: R,
    output: W,
    config: &ConvertConfig,
) -> Result<ProcessingStats> {
    debug!(
        timezone = %config.timezone,
        quoting = %config.quoting,
        buffer_size = config.buffer_size,
        "starting conversion"
    );

    let reader = RecordReader::with_capacity(
        config.buffer_size,
        BufReader::with_capacity(config.buffer_size.max(1), input),
    )?;
    let mut writer =
        RecordWriter::with_capacity(config.buffer_size.max(1), output, config.quoting);

    match pump(reader, &mut writer, config) {
        Ok(stats) => {
            writer.flush()?;
            info!(
                records = stats.records,
                group_chats = stats.group_chats,
                direct_chats = stats.direct_chats,
                "conversion finished"
            );
            Ok(stats)
        }
        Err(err) => {
            if let Err(flush_err) = writer.flush() {
                warn!(error = %flush_err, "could not flush partial output");
            }
            Err(err)
        }
    }
}

fn pump<R: std::io::BufRead, W: Write>(
    reader: RecordReader<R>,
    writer: &mut RecordWriter<W>,
    config: &ConvertConfig,
) -> Result<ProcessingStats> {
    writer.write_header(reader.header())?;

    let mut stats = ProcessingStats::default();
    for item in reader {
        let (line, raw) = item?;
        let record = transform_record(line, raw, config)?;
        trace!(
            line,
            group_chat = record.is_group_chat,
            epoch = record.epoch_seconds,
            "record"
        );
        writer.write_record(&record)?;
        stats.count(&record);
    }

    Ok(stats)
}

/// Converts `input_path` into `output_path`.
///
/// The input is opened first, so a missing input never creates or truncates
/// the output file.
pub fn convert_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConvertConfig,
) -> Result<ProcessingStats> {
    let input = File::open(input_path.as_ref())?;
    let output = File::create(output_path.as_ref())?;
    debug!(
        input = %input_path.as_ref().display(),
        output = %output_path.as_ref().display(),
        "opened files"
    );
    convert(input, output, config)
}

/// Converts an in-memory export and returns the output text.
pub fn convert_str(input: &str, config: &ConvertConfig) -> Result<String> {
    let mut output = Vec::with_capacity(input.len() + input.len() / 4);
    convert(input.as_bytes(), &mut output, config)?;
    Ok(String::from_utf8(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::QuoteMode;
    use crate::parsing::TimezonePolicy;

    const TIME: &str = "\"Saturday, 16 May 2015 at 17:07 UTC+03\"";

    fn utc() -> ConvertConfig {
        ConvertConfig::new().with_timezone(TimezonePolicy::Utc)
    }

    #[test]
    fn test_transform_record() {
        let raw = RawRecord::new(
            "T1",
            "Alice",
            "Alice",
            "Saturday, 16 May 2015 at 17:07 UTC+03",
            "Hi",
        );
        let rec = transform_record(2, raw, &utc()).unwrap();
        assert!(!rec.is_group_chat);
        assert_eq!(rec.epoch_seconds, 1431796020);
    }

    #[test]
    fn test_transform_record_error_has_line() {
        let raw = RawRecord::new("T1", "Alice", "Alice", "yesterday", "Hi");
        let err = transform_record(9, raw, &utc()).unwrap_err();
        assert_eq!(err.line(), Some(9));
        assert!(err.to_string().contains("T1,Alice,Alice,yesterday,Hi"));
    }

    #[test]
    fn test_convert_str_end_to_end() {
        let input = format!("thread,names,sender,time,text\nT1,\"Alice,Bob\",Alice,{TIME},Hello\n");
        let output = convert_str(&input, &utc()).unwrap();
        assert_eq!(
            output,
            "groupchat,thread,names,sender,time,text\n\
             True,\"T1\",\"Alice,Bob\",Alice,1431796020,\"Hello\"\n"
        );
    }

    #[test]
    fn test_convert_stats() {
        let input = format!(
            "h\nT1,\"Alice,Bob\",Alice,{TIME},a\nT2,Bob,Bob,{TIME},b\nT1,\"Alice,Bob\",Bob,{TIME},c\n"
        );
        let mut out = Vec::new();
        let stats = convert(input.as_bytes(), &mut out, &utc()).unwrap();
        assert_eq!(stats.records, 3);
        assert_eq!(stats.group_chats, 2);
        assert_eq!(stats.direct_chats, 1);
        assert_eq!(stats.lines_written(), 4);
        assert!((stats.group_ratio() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_convert_keeps_partial_output_on_error() {
        let input = format!("h\nT1,Alice,Alice,{TIME},ok\nT2,Bob,Bob,\"16 Mai 2015\",bad\n");
        let mut out = Vec::new();
        let err = convert(input.as_bytes(), &mut out, &utc()).unwrap_err();

        assert_eq!(err.line(), Some(3));
        let written = String::from_utf8(out).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.starts_with("groupchat,h\n"));
    }

    #[test]
    fn test_convert_legacy_quoting() {
        let input = format!("h\nT1,Alice,Alice,{TIME},\"say \"\"hi\"\"\"\n");
        let config = utc().with_quoting(QuoteMode::Legacy);
        let output = convert_str(&input, &config).unwrap();
        assert!(output.ends_with(",\"say \"hi\"\"\n"));
    }

    #[test]
    fn test_group_ratio_empty() {
        assert_eq!(ProcessingStats::default().group_ratio(), 0.0);
    }
}
