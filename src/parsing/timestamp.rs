//! Localized export timestamp parsing.
//!
//! Thread exports carry timestamps like `Saturday, 16 May 2015 at 17:07 UTC+03`.
//! The layout is positional: after trimming, deleting every `.` and splitting
//! on single spaces the tokens are
//!
//! | index | token        | used |
//! |-------|--------------|------|
//! | 0     | `Saturday,`  | no   |
//! | 1     | `16`         | day  |
//! | 2     | `May`        | month (English name) |
//! | 3     | `2015`       | year |
//! | 4     | `at`         | no   |
//! | 5     | `17:07`      | hour and minute |
//! | 6     | `UTC+03`     | only under [`TimezonePolicy::SourceOffset`] |
//!
//! The result is a naive date-time; turning it into epoch seconds is a
//! separate step governed by [`TimezonePolicy`].

use chrono::{
    FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, ThreadpackError, TimestampError};

/// English month names in calendar order.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolves an English month name to its number (1-12).
///
/// Matching is exact and case-sensitive, like the exports themselves.
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|&m| m == name)
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// How a naive export timestamp becomes epoch seconds.
///
/// Exports print a `UTC±NN` suffix, but the historical conversion ignored it
/// and read the wall-clock time in the host's timezone. That behaviour stays
/// the default so existing datasets reproduce; the other policies make the
/// result independent of where the converter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezonePolicy {
    /// Interpret the wall-clock time in the host's local timezone.
    #[default]
    Local,
    /// Interpret the wall-clock time as UTC.
    Utc,
    /// Apply the `UTC±NN` offset printed in the string.
    SourceOffset,
}

impl std::fmt::Display for TimezonePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimezonePolicy::Local => write!(f, "host local time"),
            TimezonePolicy::Utc => write!(f, "UTC"),
            TimezonePolicy::SourceOffset => write!(f, "offset from timestamp"),
        }
    }
}

/// A parsed export timestamp: the naive wall-clock time plus the printed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// Wall-clock date and time, seconds always zero.
    pub datetime: NaiveDateTime,
    /// The `UTC±NN` suffix, if the string had one.
    pub offset: Option<FixedOffset>,
}

impl ParsedTimestamp {
    /// Converts to seconds since 1970-01-01T00:00:00Z under `policy`.
    ///
    /// Under [`TimezonePolicy::Local`] the wall-clock time is resolved with
    /// [`local_epoch`] against the host timezone.
    pub fn to_epoch(&self, policy: TimezonePolicy) -> std::result::Result<i64, TimestampError> {
        match policy {
            TimezonePolicy::Local => Ok(local_epoch(&Local, self.datetime)),
            TimezonePolicy::Utc => Ok(self.datetime.and_utc().timestamp()),
            TimezonePolicy::SourceOffset => {
                let offset = self.offset.ok_or(TimestampError::MissingOffset)?;
                Ok(self.datetime.and_utc().timestamp() - i64::from(offset.local_minus_utc()))
            }
        }
    }
}

/// Epoch seconds of a wall-clock time read in `tz`.
///
/// Every wall-clock time maps to an instant:
/// - an ambiguous time (DST fall-back) takes the earlier instant;
/// - a time inside a DST gap (spring-forward) is read with the offset in
///   force before the gap, so `02:30` in a `+01 -> +02` gap lands at `01:30Z`.
pub fn local_epoch<Tz: TimeZone>(tz: &Tz, datetime: NaiveDateTime) -> i64 {
    match tz.from_local_datetime(&datetime) {
        LocalResult::Single(dt) => dt.timestamp(),
        LocalResult::Ambiguous(first, second) => {
            warn!(%datetime, "ambiguous local time, using the earlier instant");
            first.timestamp().min(second.timestamp())
        }
        LocalResult::None => {
            // a day back is before the transition; gaps never span that long
            let before = datetime
                .checked_sub_signed(TimeDelta::days(1))
                .unwrap_or(datetime);
            let offset = tz.offset_from_utc_datetime(&before).fix();
            warn!(
                %datetime,
                offset = %offset,
                "local time falls in a DST gap, using the offset before the gap"
            );
            datetime.and_utc().timestamp() - i64::from(offset.local_minus_utc())
        }
    }
}

/// Parses an export timestamp such as `Saturday, 16 May 2015 at 17:07 UTC+03`.
///
/// The weekday and the `at` keyword are positional and never checked. Extra
/// `:`-separated parts after the minute (seconds) are ignored.
pub fn parse_timestamp(input: &str) -> std::result::Result<ParsedTimestamp, TimestampError> {
    let cleaned = input.trim().replace('.', "");
    let tokens: Vec<&str> = cleaned.split(' ').collect();

    if !(6..=7).contains(&tokens.len()) {
        return Err(TimestampError::TokenCount {
            actual: tokens.len(),
        });
    }

    let day: u32 = parse_number("day", tokens[1])?;
    let month = month_from_name(tokens[2])
        .ok_or_else(|| TimestampError::UnknownMonth(tokens[2].to_string()))?;
    let year: i32 = parse_number("year", tokens[3])?;

    let mut clock = tokens[5].split(':');
    let hour: u32 = parse_number("hour", clock.next().unwrap_or_default())?;
    let minute: u32 = parse_number("minute", clock.next().unwrap_or_default())?;

    let datetime = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or(TimestampError::InvalidDate {
            year,
            month,
            day,
            hour,
            minute,
        })?;

    let offset = tokens.get(6).map(|tok| parse_utc_offset(tok)).transpose()?;

    Ok(ParsedTimestamp { datetime, offset })
}

/// Parses and converts in one step, reporting failures with the input attached.
///
/// # Example
///
/// ```rust
/// use threadpack::parsing::{TimezonePolicy, parse_epoch};
///
/// let epoch = parse_epoch("Saturday, 16 May 2015 at 17:07 UTC+03", TimezonePolicy::Utc)?;
/// assert_eq!(epoch, 1431796020);
/// # Ok::<(), threadpack::ThreadpackError>(())
/// ```
pub fn parse_epoch(input: &str, policy: TimezonePolicy) -> Result<i64> {
    parse_timestamp(input)
        .and_then(|ts| ts.to_epoch(policy))
        .map_err(|source| ThreadpackError::timestamp(input, source))
}

/// Parses `UTC`, `UTC+3`, `UTC+03`, `UTC-0530`, `UTC+05:30` (or `GMT...`).
pub fn parse_utc_offset(token: &str) -> std::result::Result<FixedOffset, TimestampError> {
    let invalid = || TimestampError::InvalidOffset(token.to_string());

    let rest = token
        .strip_prefix("UTC")
        .or_else(|| token.strip_prefix("GMT"))
        .ok_or_else(invalid)?;

    if rest.is_empty() {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, digits) = if let Some(d) = rest.strip_prefix('+') {
        (1, d)
    } else if let Some(d) = rest.strip_prefix('-') {
        (-1, d)
    } else {
        return Err(invalid());
    };

    let digits = digits.replace(':', "");
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let (hours, minutes) = if digits.len() <= 2 {
        (digits.as_str(), "0")
    } else {
        digits.split_at(digits.len() - 2)
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> std::result::Result<T, TimestampError> {
    value.parse().map_err(|_| TimestampError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
