//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Timezone`] - How timestamps are anchored
//! - [`Quoting`] - Output quoting discipline
//!
//! Both enums convert into their library counterparts and build a
//! [`ConvertConfig`]:
//!
//! ```rust
//! use threadpack::cli::{Quoting, Timezone};
//! use threadpack::parsing::TimezonePolicy;
//!
//! let policy: TimezonePolicy = "offset".parse::<Timezone>().unwrap().into();
//! assert_eq!(policy, TimezonePolicy::SourceOffset);
//! assert_eq!(Quoting::Legacy.to_string(), "legacy");
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::ConvertConfig;
use crate::core::output::QuoteMode;
use crate::parsing::TimezonePolicy;

/// Normalize a thread export into analysis-ready CSV: adds a `groupchat`
/// column and turns localized timestamps into Unix epoch seconds.
#[derive(Parser, Debug, Clone)]
#[command(name = "threadpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    threadpack initial_output.csv
    threadpack export.csv -o data.csv --timezone offset
    threadpack export.csv --legacy
    RUST_LOG=threadpack=debug threadpack export.csv -q")]
pub struct Args {
    /// Path to the input export (header line + 5-column CSV rows)
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = "data.csv")]
    pub output: String,

    /// How to anchor timestamps when computing epoch seconds
    #[arg(long, value_enum, default_value = "local")]
    pub timezone: Timezone,

    /// Output quoting discipline
    #[arg(long, value_enum, default_value = "escaped")]
    pub quoting: Quoting,

    /// Reproduce the historical output exactly (local time, unescaped quotes)
    #[arg(long, conflicts_with_all = ["timezone", "quoting"])]
    pub legacy: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Builds the library configuration from the parsed flags.
    pub fn to_config(&self) -> ConvertConfig {
        if self.legacy {
            return ConvertConfig::legacy();
        }
        ConvertConfig::new()
            .with_timezone(self.timezone.into())
            .with_quoting(self.quoting.into())
    }
}

/// Timestamp anchoring choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    /// Wall-clock time in this machine's timezone (historical behaviour)
    #[default]
    Local,

    /// Wall-clock time read as UTC
    Utc,

    /// Apply the UTC±NN suffix printed in each timestamp
    #[value(alias = "source")]
    #[serde(alias = "source")]
    Offset,
}

impl Timezone {
    /// Returns all supported names (including aliases).
    pub fn all_names() -> &'static [&'static str] {
        &["local", "utc", "offset", "source"]
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timezone::Local => write!(f, "local"),
            Timezone::Utc => write!(f, "utc"),
            Timezone::Offset => write!(f, "offset"),
        }
    }
}

impl std::str::FromStr for Timezone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Timezone::Local),
            "utc" => Ok(Timezone::Utc),
            "offset" | "source" => Ok(Timezone::Offset),
            _ => Err(format!(
                "Unknown timezone: '{}'. Expected one of: {}",
                s,
                Timezone::all_names().join(", ")
            )),
        }
    }
}

impl From<Timezone> for TimezonePolicy {
    fn from(tz: Timezone) -> TimezonePolicy {
        match tz {
            Timezone::Local => TimezonePolicy::Local,
            Timezone::Utc => TimezonePolicy::Utc,
            Timezone::Offset => TimezonePolicy::SourceOffset,
        }
    }
}

/// Output quoting choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Raw quote wrapping, no escaping
    Legacy,

    /// Same layout as legacy, embedded quotes doubled (default)
    #[default]
    Escaped,

    /// Quote only where CSV requires it
    Minimal,
}

impl Quoting {
    /// Returns all supported names.
    pub fn all_names() -> &'static [&'static str] {
        &["legacy", "escaped", "minimal"]
    }
}

impl std::fmt::Display for Quoting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quoting::Legacy => write!(f, "legacy"),
            Quoting::Escaped => write!(f, "escaped"),
            Quoting::Minimal => write!(f, "minimal"),
        }
    }
}

impl std::str::FromStr for Quoting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Quoting::Legacy),
            "escaped" => Ok(Quoting::Escaped),
            "minimal" => Ok(Quoting::Minimal),
            _ => Err(format!(
                "Unknown quoting: '{}'. Expected one of: {}",
                s,
                Quoting::all_names().join(", ")
            )),
        }
    }
}

impl From<Quoting> for QuoteMode {
    fn from(quoting: Quoting) -> QuoteMode {
        match quoting {
            Quoting::Legacy => QuoteMode::Legacy,
            Quoting::Escaped => QuoteMode::Escaped,
            Quoting::Minimal => QuoteMode::Minimal,
        }
    }
}
