//! Property-based tests for threadpack.
//!
//! These tests generate random inputs to find edge cases.

use proptest::prelude::*;

use threadpack::core::output::{QuoteMode, serialize_record};
use threadpack::parsing::{MONTHS, TimezonePolicy, parse_timestamp};
use threadpack::prelude::*;

/// Generate a field value from a fixed pool (no regex strategies)
fn arb_field() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Alice".to_string(),
        "Bob, Eve".to_string(),
        "Team \"A\"".to_string(),
        "Иван".to_string(),
        "🎉🔥 emoji".to_string(),
        "line1\nline2".to_string(),
        "trailing,".to_string(),
        String::new(),
        "   ".to_string(),
    ])
}

fn arb_timestamp() -> impl Strategy<Value = (String, i32, u32, u32, u32, u32)> {
    (2000i32..2030, 0usize..12, 1u32..29, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, mi)| {
        (
            format!("Monday, {d} {} {y} at {h}:{mi:02} UTC+02", MONTHS[m]),
            y,
            m as u32 + 1,
            d,
            h,
            mi,
        )
    })
}

fn arb_record() -> impl Strategy<Value = FormattedRecord> {
    (
        any::<bool>(),
        arb_field(),
        arb_field(),
        arb_field(),
        any::<i64>(),
        arb_field(),
    )
        .prop_map(
            |(is_group_chat, thread_name, participants, sender, epoch_seconds, text)| {
                FormattedRecord {
                    is_group_chat,
                    thread_name,
                    participants,
                    sender,
                    epoch_seconds,
                    text,
                }
            },
        )
}

/// Quote a field for the input side of an export.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // TIMESTAMP PROPERTIES
    // ============================================

    /// Every well-formed timestamp parses back to its components
    #[test]
    fn timestamp_components_roundtrip((input, y, m, d, h, mi) in arb_timestamp()) {
        let ts = parse_timestamp(&input).unwrap();
        let expected = chrono::NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap();
        prop_assert_eq!(ts.datetime, expected);
    }

    /// The printed offset accounts for exactly the difference between policies
    #[test]
    fn source_offset_differs_from_utc_by_offset((input, ..) in arb_timestamp()) {
        let ts = parse_timestamp(&input).unwrap();
        let utc = ts.to_epoch(TimezonePolicy::Utc).unwrap();
        let offset = ts.to_epoch(TimezonePolicy::SourceOffset).unwrap();
        prop_assert_eq!(utc - offset, 2 * 3600);
    }

    /// Parser never panics on arbitrary text
    #[test]
    fn parse_never_panics(input in ".{0,60}") {
        let _ = parse_timestamp(&input);
    }

    // ============================================
    // GROUP DETECTION
    // ============================================

    /// Group flag is exactly "participants contains a comma"
    #[test]
    fn group_flag_matches_comma(names in prop::collection::vec("[A-Za-z ]{1,8}", 1..5)) {
        let participants = names.join(",");
        prop_assert_eq!(is_group_chat(&participants), names.len() > 1);
    }

    // ============================================
    // SERIALIZER PROPERTIES
    // ============================================

    /// Escaped and minimal output read back to the same six fields
    #[test]
    fn escaped_output_is_valid_csv(record in arb_record()) {
        for mode in [QuoteMode::Escaped, QuoteMode::Minimal] {
            let line = serialize_record(&record, mode).unwrap();
            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(line.as_bytes());
            let row = reader.records().next().unwrap().unwrap();

            prop_assert_eq!(row.len(), 6);
            prop_assert_eq!(&row[0], if record.is_group_chat { "True" } else { "False" });
            prop_assert_eq!(&row[1], record.thread_name.as_str());
            prop_assert_eq!(&row[2], record.participants.as_str());
            prop_assert_eq!(&row[3], record.sender.as_str());
            prop_assert_eq!(row[4].parse::<i64>().unwrap(), record.epoch_seconds);
            prop_assert_eq!(&row[5], record.text.as_str());
        }
    }

    /// Legacy output is the fixed raw-quote template
    #[test]
    fn legacy_output_template(record in arb_record()) {
        let line = serialize_record(&record, QuoteMode::Legacy).unwrap();
        let expected = format!(
            "{},\"{}\",\"{}\",{},{},\"{}\"",
            if record.is_group_chat { "True" } else { "False" },
            record.thread_name,
            record.participants,
            record.sender,
            record.epoch_seconds,
            record.text
        );
        prop_assert_eq!(line, expected);
    }

    // ============================================
    // PIPELINE PROPERTIES
    // ============================================

    /// N input records give exactly N+1 output records, in order
    #[test]
    fn pipeline_preserves_count_and_order(
        rows in prop::collection::vec((arb_field(), arb_field(), arb_timestamp()), 0..20)
    ) {
        let mut input = String::from("thread,names,sender,time,text\n");
        for (i, (participants, text, (time, ..))) in rows.iter().enumerate() {
            input.push_str(&format!(
                "T{i},{},Alice,{},{}\n",
                csv_field(participants),
                csv_field(time),
                csv_field(text)
            ));
        }

        let config = ConvertConfig::new().with_timezone(TimezonePolicy::Utc);
        let output = convert_str(&input, &config).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(output.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(std::result::Result::unwrap).collect();

        prop_assert_eq!(records.len(), rows.len());
        for (i, (record, (participants, text, _))) in records.iter().zip(&rows).enumerate() {
            let thread = format!("T{i}");
            prop_assert_eq!(&record[1], thread.as_str());
            prop_assert_eq!(&record[2], participants.as_str());
            prop_assert_eq!(&record[5], text.as_str());
            prop_assert_eq!(&record[0], if participants.contains(',') { "True" } else { "False" });
        }
    }
}
