//! Command line interface.

pub mod command;

use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::product::DEFAULT_HOST;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log every fetch attempt
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get hourly radar-only QPE files
    RadarOnly(JobArgs),
    /// Get two-minute precipitation rate files
    PrecipRate(JobArgs),
}

/// Options shared by every download job. Unset values fall back to the
/// product defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// First timestamp, e.g. 2023-04-30T00:00
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<NaiveDateTime>,

    /// Last timestamp, included when it lands on a step
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<NaiveDateTime>,

    /// Step between timestamps: 2m, 1h, 30s or bare minutes
    #[arg(long, value_parser = parse_step)]
    pub step: Option<Duration>,

    /// Existing directory the files are written into
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Retry missing timestamps against the hourly radar-only product
    #[arg(long)]
    pub fallback: bool,

    /// Archive host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

/// Parses `YYYY-MM-DDTHH:MM[:SS]`, with `T` or a space as separator.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s.trim(), format).ok())
        .ok_or_else(|| format!("`{}` is not a timestamp like 2023-04-30T00:00", s))
}

/// Parses `<n>s`, `<n>m`, `<n>h` or a bare number of minutes.
pub fn parse_step(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (digits, unit) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], c),
        _ => (s, 'm'),
    };

    let n: i64 = digits
        .parse()
        .map_err(|_| format!("`{}` is not a step like 2m or 1h", s))?;
    if n <= 0 {
        return Err("step must be positive".to_string());
    }

    match unit {
        's' => Ok(Duration::seconds(n)),
        'm' => Ok(Duration::minutes(n)),
        'h' => Ok(Duration::hours(n)),
        _ => Err(format!("unknown step unit `{}`", unit)),
    }
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    )
}

// -- Tests -------------------------------------------------------------------
